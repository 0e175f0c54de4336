//! Terminal and JSON rendering for the CLI commands.

use crate::core::engine::TriageSession;
use crate::core::form::{Form, Question, QuestionId, QuestionType, ResultId, TriageResult};
use crate::core::loader::FormListing;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use triage_types::EngineState;

pub fn write_menu<W: Write>(out: &mut W, listings: &[FormListing]) -> io::Result<()> {
    writeln!(out, "Select a form to run:")?;
    for listing in listings {
        writeln!(out, "{}: {}", listing.number, listing.form_id)?;
    }
    Ok(())
}

/// Print a question, its options as `key: label`, and the answer prompt.
pub fn write_question<W: Write>(out: &mut W, question: &Question) -> io::Result<()> {
    writeln!(out, "Question: {}", question.text)?;
    if let Some(options) = question.option_keys() {
        let rendered: Vec<String> = options
            .iter()
            .map(|(key, label)| format!("{}: {}", key, label))
            .collect();
        writeln!(out, "Options: {}", rendered.join(", "))?;
    }
    write!(out, "Answer: ")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: QuestionId,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<i64, String>>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            question_type: question.question_type,
            options: question.option_keys().cloned(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultView {
    pub id: ResultId,
    pub text: String,
}

impl From<&TriageResult> for ResultView {
    fn from(result: &TriageResult) -> Self {
        Self {
            id: result.id,
            text: result.text.clone(),
        }
    }
}

/// Report printed by `triage step`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub form_id: String,
    /// Question the session was positioned at
    pub question: QuestionView,
    pub next_question: Option<QuestionView>,
    pub result: Option<ResultView>,
    pub complete: bool,
    pub transitioned: bool,
    /// Cursor to pass as `--state` on the next step
    pub state: EngineState,
}

impl StepReport {
    pub fn from_session(form: &Form, session: &TriageSession<'_>) -> Self {
        Self {
            form_id: form.form_id().to_string(),
            question: session.current_question().into(),
            next_question: session.next_question().map(QuestionView::from),
            result: session.result().map(ResultView::from),
            complete: session.is_complete(),
            transitioned: session.transitioned(),
            state: session.engine_state(),
        }
    }
}
