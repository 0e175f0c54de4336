use crate::core::actions::ActionDescriptor;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::collections::{BTreeMap, HashMap};
use triage_types::{FormDocument, QuestionDocument, ResultDocument, RuleDocument};

pub use triage_types::{QuestionId, QuestionType, ResultId};

/// Condition/action/transition triple attached to a question.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    pub condition: Option<String>,
    pub action: Option<ActionDescriptor>,
    pub goto_question_id: Option<QuestionId>,
    pub goto_result_id: Option<ResultId>,
}

impl Rule {
    /// Rule guarded by `condition`.
    pub fn when(condition: impl Into<String>) -> Self {
        Self {
            condition: Some(condition.into()),
            ..Self::default()
        }
    }

    /// Fallback rule without a condition.
    pub fn fallback() -> Self {
        Self::default()
    }

    pub fn goto_question(mut self, id: i64) -> Self {
        self.goto_question_id = Some(QuestionId(id));
        self
    }

    pub fn goto_result(mut self, id: i64) -> Self {
        self.goto_result_id = Some(ResultId(id));
        self
    }

    pub fn with_action(mut self, action: ActionDescriptor) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.condition.is_none()
    }

    fn from_document(doc: RuleDocument) -> Result<Self, AppError> {
        let action = doc
            .action_descriptor
            .as_deref()
            .map(ActionDescriptor::parse)
            .transpose()?;
        Ok(Self {
            condition: doc.condition,
            action,
            goto_question_id: doc.goto_question_id,
            goto_result_id: doc.goto_result_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Option<BTreeMap<i64, String>>,
    /// Declared order is priority order.
    pub rules: Vec<Rule>,
}

impl Question {
    pub fn new(id: i64, text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: QuestionId(id),
            text: text.into(),
            question_type,
            options: None,
            rules: Vec::new(),
        }
    }

    pub fn with_option(mut self, key: i64, label: impl Into<String>) -> Self {
        self.options
            .get_or_insert_with(BTreeMap::new)
            .insert(key, label.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Options to validate answers against; `None` when the question does not
    /// restrict keys.
    pub fn option_keys(&self) -> Option<&BTreeMap<i64, String>> {
        self.options.as_ref().filter(|options| !options.is_empty())
    }

    fn from_document(doc: QuestionDocument) -> Result<Self, AppError> {
        let id = doc.id;
        let rules = doc
            .rules
            .into_iter()
            .map(Rule::from_document)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.with_context("question_id", id))?;
        Ok(Self {
            id,
            text: doc.text,
            question_type: doc.question_type,
            options: doc.options,
            rules,
        })
    }
}

/// Terminal outcome of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriageResult {
    pub id: ResultId,
    pub text: String,
}

impl TriageResult {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id: ResultId(id),
            text: text.into(),
        }
    }
}

impl From<ResultDocument> for TriageResult {
    fn from(doc: ResultDocument) -> Self {
        Self {
            id: doc.id,
            text: doc.text,
        }
    }
}

/// Immutable graph of questions and results interpreted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    form_id: String,
    first_question_id: QuestionId,
    questions: Vec<Question>,
    results: Vec<TriageResult>,
    question_index: HashMap<QuestionId, usize>,
    result_index: HashMap<ResultId, usize>,
}

impl Form {
    /// Build a form, rejecting duplicate question or result ids.
    pub fn new(
        form_id: impl Into<String>,
        first_question_id: QuestionId,
        questions: Vec<Question>,
        results: Vec<TriageResult>,
    ) -> Result<Self, AppError> {
        let form_id = form_id.into();

        let mut question_index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question_index.insert(question.id, position).is_some() {
                return Err(AppError::new(
                    ErrorCategory::FormIntegrity,
                    format!("duplicate question id: {}", question.id),
                )
                .with_context("form_id", &form_id));
            }
        }

        let mut result_index = HashMap::with_capacity(results.len());
        for (position, result) in results.iter().enumerate() {
            if result_index.insert(result.id, position).is_some() {
                return Err(AppError::new(
                    ErrorCategory::FormIntegrity,
                    format!("duplicate result id: {}", result.id),
                )
                .with_context("form_id", &form_id));
            }
        }

        Ok(Self {
            form_id,
            first_question_id,
            questions,
            results,
            question_index,
            result_index,
        })
    }

    pub fn from_document(doc: FormDocument) -> Result<Self, AppError> {
        let form_id = doc.form_id;
        let questions = doc
            .questions
            .into_iter()
            .map(Question::from_document)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| err.with_context("form_id", &form_id))?;
        let results = doc.results.into_iter().map(TriageResult::from).collect();
        Form::new(form_id, doc.first_question_id, questions, results)
    }

    /// Parse and build a form from a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, AppError> {
        let doc: FormDocument = serde_json::from_str(text).map_err(|err| {
            AppError::with_source(
                ErrorCategory::Deserialization,
                format!("failed to parse form document: {}", err),
                err,
            )
        })?;
        Form::from_document(doc)
    }

    /// Parse and build a form from a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, AppError> {
        let doc: FormDocument = serde_yaml::from_str(text).map_err(|err| {
            AppError::with_source(
                ErrorCategory::Deserialization,
                format!("failed to parse form document: {}", err),
                err,
            )
        })?;
        Form::from_document(doc)
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn first_question_id(&self) -> QuestionId {
        self.first_question_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn results(&self) -> &[TriageResult] {
        &self.results
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.question_index
            .get(&id)
            .map(|&position| &self.questions[position])
    }

    pub fn result(&self, id: ResultId) -> Option<&TriageResult> {
        self.result_index
            .get(&id)
            .map(|&position| &self.results[position])
    }

    pub fn first_question(&self) -> Option<&Question> {
        self.question(self.first_question_id)
    }
}
