//! Answer validation and rule selection for a single question.

use crate::core::condition::{AnswerValue, Condition};
use crate::core::error::AppError;
use crate::core::form::{Question, QuestionType, Rule};
use crate::core::types::ErrorCategory;

/// How the effective rule set was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSelection {
    /// At least one condition held; these are every matching rule.
    Matched,
    /// No condition held; these are the fallback rules.
    Fallback,
}

/// Ordered rules that govern a transition, with the parsed answer they were
/// selected for.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'q> {
    pub answer: AnswerValue,
    pub selection: RuleSelection,
    pub rules: Vec<&'q Rule>,
}

/// Validate `raw` against the question type and convert it to the value bound
/// to `x` in conditions.
pub fn parse_answer(question: &Question, raw: &str) -> Result<AnswerValue, AppError> {
    match question.question_type {
        QuestionType::Text => {
            if raw.trim().is_empty() {
                return Err(invalid_answer(question, raw, "answer must not be blank"));
            }
            Ok(AnswerValue::Text(raw.to_string()))
        }
        QuestionType::SingleChoice => {
            let key = parse_key(question, raw)?;
            Ok(AnswerValue::Choice(key))
        }
        QuestionType::MultipleChoice => {
            let keys = raw
                .split(',')
                .map(|token| parse_key(question, token))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AnswerValue::Choices(keys))
        }
        QuestionType::FileUpload => Err(AppError::new(
            ErrorCategory::NotSupported,
            "file upload questions are not supported",
        )
        .with_context("question_id", question.id)),
    }
}

fn parse_key(question: &Question, token: &str) -> Result<i64, AppError> {
    let key = token.trim().parse::<i64>().map_err(|_| {
        invalid_answer(
            question,
            token,
            &format!("'{}' is not an option number", token.trim()),
        )
    })?;
    if let Some(options) = question.option_keys() {
        if !options.contains_key(&key) {
            return Err(invalid_answer(
                question,
                token,
                &format!("{} is not one of the offered options", key),
            ));
        }
    }
    Ok(key)
}

fn invalid_answer(question: &Question, raw: &str, reason: &str) -> AppError {
    AppError::new(ErrorCategory::InvalidAnswer, format!("invalid answer: {}", reason))
        .with_context("question_id", question.id)
        .with_context("answer", raw)
        .with_suggestion(match question.question_type {
            QuestionType::SingleChoice => "Enter one option number",
            QuestionType::MultipleChoice => "Enter option numbers separated by commas",
            _ => "Enter a non-empty answer",
        })
}

/// Select the rules that govern the transition for `raw`.
///
/// Every conditioned rule whose condition holds is returned in declared order.
/// When none holds, the fallback rules are returned instead. With neither the
/// question has no applicable rule.
pub fn resolve<'q>(question: &'q Question, raw: &str) -> Result<Resolution<'q>, AppError> {
    let answer = parse_answer(question, raw)?;

    let mut matched = Vec::new();
    for rule in &question.rules {
        let Some(source) = rule.condition.as_deref() else {
            continue;
        };
        let holds = Condition::compile(source)
            .and_then(|condition| condition.evaluate(&answer))
            .map_err(|err| {
                AppError::from(err)
                    .with_context("question_id", question.id)
                    .with_context("condition", source)
            })?;
        tracing::debug!(
            question_id = %question.id,
            condition = source,
            answer = %answer,
            holds,
            "evaluated rule condition"
        );
        if holds {
            matched.push(rule);
        }
    }

    if !matched.is_empty() {
        return Ok(Resolution {
            answer,
            selection: RuleSelection::Matched,
            rules: matched,
        });
    }

    let fallback: Vec<&Rule> = question.rules.iter().filter(|rule| rule.is_fallback()).collect();
    if fallback.is_empty() {
        return Err(AppError::new(
            ErrorCategory::NoApplicableRule,
            format!("no rule of question {} applies to answer {}", question.id, answer),
        )
        .with_context("question_id", question.id)
        .with_suggestion("Add a rule without a condition to catch unmatched answers"));
    }

    Ok(Resolution {
        answer,
        selection: RuleSelection::Fallback,
        rules: fallback,
    })
}
