//! Triage state machine.
//!
//! A session is either awaiting an answer to its current question or complete
//! with a result. Sessions are immutable snapshots borrowed from the [`Form`];
//! every processed answer yields a new snapshot, and a failed turn leaves the
//! previous one untouched.

use crate::core::actions::ActionRegistry;
use crate::core::error::AppError;
use crate::core::form::{Form, Question, TriageResult};
use crate::core::resolver::{self, RuleSelection};
use crate::core::types::ErrorCategory;
use triage_types::EngineState;

/// Snapshot of a triage session after a turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriageSession<'f> {
    current_question: &'f Question,
    next_question: Option<&'f Question>,
    result: Option<&'f TriageResult>,
}

impl<'f> TriageSession<'f> {
    fn new(
        current_question: &'f Question,
        next_question: Option<&'f Question>,
        result: Option<&'f TriageResult>,
    ) -> Self {
        Self {
            current_question,
            next_question,
            result,
        }
    }

    pub fn current_question(&self) -> &'f Question {
        self.current_question
    }

    pub fn next_question(&self) -> Option<&'f Question> {
        self.next_question
    }

    pub fn result(&self) -> Option<&'f TriageResult> {
        self.result
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// False when the last answer neither moved to a question nor reached a
    /// result; the caller decides whether to ask again.
    pub fn transitioned(&self) -> bool {
        self.next_question.is_some() || self.result.is_some()
    }

    /// Question the presentation layer should ask next.
    pub fn pending_question(&self) -> &'f Question {
        self.next_question.unwrap_or(self.current_question)
    }

    /// Cursor to persist for the next turn.
    pub fn engine_state(&self) -> EngineState {
        EngineState::new(
            Some(self.pending_question().id),
            self.result.map(|result| result.id),
        )
    }
}

/// Drives sessions over a form, dispatching rule actions through the
/// registry it was built with.
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
    actions: ActionRegistry,
}

impl TriageEngine {
    pub fn new(actions: ActionRegistry) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    /// Rebuild the session described by a saved state blob.
    ///
    /// An absent, blank or `null` blob starts at the form's first question.
    /// A saved result id that no longer resolves yields an incomplete session
    /// with neither result nor next question.
    pub fn initial_state<'f>(
        &self,
        form: &'f Form,
        saved_state: Option<&str>,
    ) -> Result<TriageSession<'f>, AppError> {
        let state = match saved_state.map(str::trim).filter(|blob| !blob.is_empty()) {
            None => None,
            Some(blob) => EngineState::from_json(blob).map_err(|err| {
                AppError::with_source(
                    ErrorCategory::StateDecode,
                    format!("saved engine state is not valid: {}", err),
                    err,
                )
                .with_context("form_id", form.form_id())
            })?,
        };
        self.resume(form, state.unwrap_or_default())
    }

    /// Rebuild the session a decoded cursor points at.
    pub fn resume<'f>(
        &self,
        form: &'f Form,
        state: EngineState,
    ) -> Result<TriageSession<'f>, AppError> {
        let question = match state.question_id.and_then(|id| form.question(id)) {
            Some(question) => question,
            None => {
                if let Some(id) = state.question_id {
                    tracing::warn!(
                        form_id = form.form_id(),
                        question_id = %id,
                        "saved question not found, restarting at first question"
                    );
                }
                first_question(form)?
            }
        };

        let result = state.result_id.and_then(|id| {
            let result = form.result(id);
            if result.is_none() {
                tracing::warn!(
                    form_id = form.form_id(),
                    result_id = %id,
                    "saved result not found, session left incomplete"
                );
            }
            result
        });

        Ok(TriageSession::new(question, None, result))
    }

    /// Apply `answer` to the session's current question.
    ///
    /// Every effective rule's action runs in order. The first rule pointing at
    /// a question ends the turn with that question next and no result. The
    /// first rule pointing at a result sets it, but a later question rule still
    /// takes precedence.
    pub fn process_answer<'f>(
        &self,
        answer: &str,
        session: &TriageSession<'f>,
        form: &'f Form,
    ) -> Result<TriageSession<'f>, AppError> {
        let question = session.current_question();
        let span = tracing::debug_span!(
            "process_answer",
            form_id = form.form_id(),
            question_id = %question.id
        );
        let _entered = span.enter();

        let resolution = resolver::resolve(question, answer)
            .map_err(|err| err.with_context("form_id", form.form_id()))?;
        if resolution.selection == RuleSelection::Fallback {
            tracing::debug!("no condition matched, using fallback rules");
        }

        let mut result: Option<&'f TriageResult> = None;
        let mut result_claimed = false;

        for rule in resolution.rules {
            if let Some(action) = &rule.action {
                self.actions.dispatch(action);
            }

            if let Some(target) = rule.goto_question_id {
                let next = form.question(target);
                match next {
                    Some(next) => tracing::info!(next_question_id = %next.id, "moving to question"),
                    None => tracing::warn!(
                        target_question_id = %target,
                        "rule points at a question that is not in the form"
                    ),
                }
                return Ok(TriageSession::new(question, next, None));
            }

            if let Some(target) = rule.goto_result_id {
                if !result_claimed {
                    result_claimed = true;
                    result = form.result(target);
                    if result.is_none() {
                        tracing::warn!(
                            target_result_id = %target,
                            "rule points at a result that is not in the form"
                        );
                    }
                }
            }
        }

        match result {
            Some(result) => tracing::info!(result_id = %result.id, "triage complete"),
            None => tracing::debug!("answer caused no transition"),
        }
        Ok(TriageSession::new(question, None, result))
    }
}

fn first_question(form: &Form) -> Result<&Question, AppError> {
    form.first_question().ok_or_else(|| {
        AppError::new(
            ErrorCategory::FormIntegrity,
            format!(
                "first question {} is not defined in form {}",
                form.first_question_id(),
                form.form_id()
            ),
        )
        .with_context("form_id", form.form_id())
    })
}
