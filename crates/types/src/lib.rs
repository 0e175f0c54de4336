//! Wire types shared by the triage engine and anything that reads or writes
//! triage form documents and saved engine state.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a question inside a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub i64);

/// Identifier of a terminal result inside a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub i64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of answer a question expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    Text,
    SingleChoice,
    MultipleChoice,
    FileUpload,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "Text",
            QuestionType::SingleChoice => "SingleChoice",
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::FileUpload => "FileUpload",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root of a triage form document as authored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDocument {
    pub form_id: String,
    pub first_question_id: QuestionId,
    pub questions: Vec<QuestionDocument>,
    #[serde(default)]
    pub results: Vec<ResultDocument>,
}

/// A single question as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<i64, String>>,
    #[serde(default)]
    pub rules: Vec<RuleDocument>,
}

/// A rule as authored. Blank `condition` and `actionDescriptor` strings are
/// read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    #[serde(
        default,
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub condition: Option<String>,
    #[serde(
        default,
        alias = "action",
        deserialize_with = "non_blank",
        skip_serializing_if = "Option::is_none"
    )]
    pub action_descriptor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goto_question_id: Option<QuestionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goto_result_id: Option<ResultId>,
}

/// A terminal result as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDocument {
    pub id: ResultId,
    pub text: String,
}

/// Resumable cursor passed between turns of a triage session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub result_id: Option<ResultId>,
}

impl EngineState {
    pub fn new(question_id: Option<QuestionId>, result_id: Option<ResultId>) -> Self {
        Self {
            question_id,
            result_id,
        }
    }

    /// Serialize the cursor to its JSON blob form.
    pub fn to_json(&self) -> String {
        // Two optional integers cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Parse a saved blob. A JSON `null` yields `None`.
    pub fn from_json(blob: &str) -> Result<Option<Self>, serde_json::Error> {
        serde_json::from_str::<Option<EngineState>>(blob)
    }
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}
