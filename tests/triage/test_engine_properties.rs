use std::path::PathBuf;
use triage::core::actions::ActionRegistry;
use triage::core::engine::TriageEngine;
use triage::core::form::{Form, Question, QuestionId, QuestionType, ResultId, Rule, TriageResult};
use triage::core::loader::FormLoader;
use triage::core::types::ErrorCategory;
use triage::core::EngineState;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/forms")
}

fn headache() -> Form {
    FormLoader::new(fixtures()).load("Headache").unwrap()
}

fn two_way() -> Form {
    Form::new(
        "two-way",
        QuestionId(1),
        vec![
            Question::new(1, "Pick", QuestionType::SingleChoice)
                .with_rule(Rule::when("x == 1").goto_question(2))
                .with_rule(Rule::when("x == 2").goto_result(1)),
            Question::new(2, "Then", QuestionType::Text).with_rule(Rule::fallback().goto_result(1)),
        ],
        vec![TriageResult::new(1, "R1")],
    )
    .unwrap()
}

fn engine() -> TriageEngine {
    TriageEngine::new(ActionRegistry::with_defaults())
}

#[test]
fn test_empty_saved_state_starts_at_first_question() {
    let form = headache();
    let engine = engine();
    for blob in [None, Some(""), Some("   "), Some("null")] {
        let session = engine.initial_state(&form, blob).unwrap();
        assert_eq!(session.current_question().id, form.first_question_id());
        assert!(!session.is_complete());
        assert!(session.next_question().is_none());
    }
}

#[test]
fn test_unresolvable_result_id_leaves_session_incomplete() {
    let form = headache();
    let session = engine()
        .initial_state(&form, Some(r#"{"questionId": 2, "resultId": 404}"#))
        .unwrap();
    assert!(!session.is_complete());
    assert!(session.next_question().is_none());
    assert_eq!(session.current_question().id, QuestionId(2));
}

#[test]
fn test_saved_result_completes_session() {
    let form = headache();
    let session = engine()
        .initial_state(&form, Some(r#"{"questionId": null, "resultId": 12}"#))
        .unwrap();
    assert!(session.is_complete());
    assert_eq!(session.result().unwrap().id, ResultId(12));
}

#[test]
fn test_unresolvable_question_id_falls_back_to_first() {
    let form = headache();
    let session = engine()
        .initial_state(&form, Some(r#"{"questionId": 77}"#))
        .unwrap();
    assert_eq!(session.current_question().id, QuestionId(1));
}

#[test]
fn test_initial_state_is_idempotent() {
    let form = headache();
    let engine = engine();
    let blob = r#"{"questionId": 3, "resultId": null}"#;
    let first = engine.initial_state(&form, Some(blob)).unwrap();
    let second = engine.initial_state(&form, Some(blob)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_malformed_state_is_decode_error() {
    let form = headache();
    for blob in ["{", "42", r#"{"questionId": "three"}"#] {
        let err = engine().initial_state(&form, Some(blob)).unwrap_err();
        assert_eq!(err.category, ErrorCategory::StateDecode, "{}", blob);
    }
}

#[test]
fn test_single_choice_branches() {
    let form = two_way();
    let engine = engine();
    let start = engine.initial_state(&form, None).unwrap();

    let to_question = engine.process_answer("1", &start, &form).unwrap();
    assert_eq!(to_question.next_question().unwrap().id, QuestionId(2));
    assert!(!to_question.is_complete());

    let to_result = engine.process_answer("2", &start, &form).unwrap();
    assert_eq!(to_result.result().unwrap().id, ResultId(1));
    assert!(to_result.is_complete());
}

#[test]
fn test_no_applicable_rule_keeps_prior_session() {
    let form = two_way();
    let engine = engine();
    let start = engine.initial_state(&form, None).unwrap();
    let err = engine.process_answer("3", &start, &form).unwrap_err();
    assert_eq!(err.category, ErrorCategory::NoApplicableRule);
    assert_eq!(start.current_question().id, QuestionId(1));
    assert!(engine.process_answer("1", &start, &form).is_ok());
}

#[test]
fn test_blank_text_answer_is_invalid() {
    let form = two_way();
    let engine = engine();
    let at_text = engine
        .initial_state(&form, Some(r#"{"questionId": 2}"#))
        .unwrap();
    for answer in ["", "   "] {
        let err = engine.process_answer(answer, &at_text, &form).unwrap_err();
        assert_eq!(err.category, ErrorCategory::InvalidAnswer);
        assert!(err.is_recoverable());
    }
}

#[test]
fn test_multiple_choice_matches_sequence_condition() {
    let form = headache();
    let engine = engine();
    let at_symptoms = engine.resume(&form, EngineState::new(Some(QuestionId(2)), None)).unwrap();

    let both = engine.process_answer("1,2", &at_symptoms, &form).unwrap();
    assert_eq!(both.result().unwrap().id, ResultId(11));

    let err = engine.process_answer("1,x", &at_symptoms, &form).unwrap_err();
    assert_eq!(err.category, ErrorCategory::InvalidAnswer);

    let unknown_option = engine.process_answer("1,9", &at_symptoms, &form).unwrap_err();
    assert_eq!(unknown_option.category, ErrorCategory::InvalidAnswer);
}

#[test]
fn test_fallback_rule_applies_when_nothing_matches() {
    let form = headache();
    let engine = engine();
    let at_symptoms = engine.resume(&form, EngineState::new(Some(QuestionId(2)), None)).unwrap();
    let next = engine.process_answer(" 1 ", &at_symptoms, &form).unwrap();
    assert_eq!(next.result().unwrap().id, ResultId(12));
}

#[test]
fn test_full_walk_through_saved_state() {
    let form = headache();
    let engine = engine();

    let start = engine.initial_state(&form, None).unwrap();
    let after_age = engine.process_answer("2", &start, &form).unwrap();
    let blob = after_age.engine_state().to_json();
    assert_eq!(blob, r#"{"questionId":2,"resultId":null}"#);

    let symptoms = engine.initial_state(&form, Some(&blob)).unwrap();
    let after_symptoms = engine.process_answer("3", &symptoms, &form).unwrap();
    let blob = after_symptoms.engine_state().to_json();

    let pain = engine.initial_state(&form, Some(&blob)).unwrap();
    assert_eq!(pain.current_question().text, "Describe the pain");
    let done = engine
        .process_answer("the worst headache ever", &pain, &form)
        .unwrap();
    assert_eq!(done.result().unwrap().text, "Seek emergency care now.");
    assert_eq!(done.engine_state().result_id, Some(ResultId(11)));
}

#[test]
fn test_file_upload_is_not_supported() {
    let form = FormLoader::new(fixtures()).load("Stalls").unwrap();
    let engine = engine();
    let upload = engine
        .initial_state(&form, Some(r#"{"questionId": 2}"#))
        .unwrap();
    let err = engine.process_answer("scan.png", &upload, &form).unwrap_err();
    assert_eq!(err.category, ErrorCategory::NotSupported);
}

#[test]
fn test_broken_condition_fails_the_turn() {
    let form = FormLoader::new(fixtures()).load("Stalls").unwrap();
    let engine = engine();
    let broken = engine
        .initial_state(&form, Some(r#"{"questionId": 3}"#))
        .unwrap();
    let err = engine.process_answer("anything", &broken, &form).unwrap_err();
    assert_eq!(err.category, ErrorCategory::ConditionCompilation);
    assert_eq!(err.context.get("condition"), Some(&"x ===".to_string()));
}

#[test]
fn test_no_transition_and_unresolved_targets() {
    let form = FormLoader::new(fixtures()).load("Stalls").unwrap();
    let engine = engine();
    let start = engine.initial_state(&form, None).unwrap();

    let action_only = engine.process_answer("1", &start, &form).unwrap();
    assert!(!action_only.transitioned());

    let dangling = engine.process_answer("2", &start, &form).unwrap();
    assert!(!dangling.transitioned());
    assert_eq!(dangling.engine_state().question_id, Some(QuestionId(1)));

    let done = engine.process_answer("3", &start, &form).unwrap();
    assert!(done.is_complete());
}
