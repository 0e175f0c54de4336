use std::path::PathBuf;
use triage::core::dot::form_to_dot;
use triage::core::form::{Form, Question, QuestionId, QuestionType, Rule};
use triage::core::loader::FormLoader;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/forms")
}

#[test]
fn test_fixture_graph_has_every_node_and_edge() {
    let form = FormLoader::new(fixtures()).load("Headache").unwrap();
    let dot = form_to_dot(&form);

    assert!(dot.starts_with("digraph {"));
    assert_eq!(dot.matches("label = \"Q").count(), 3);
    assert_eq!(dot.matches("label = \"R").count(), 3);
    assert_eq!(dot.matches(" -> ").count(), 7);
    assert!(dot.contains("default"));
    assert!(dot.contains("/ LogInformation"));
}

#[test]
fn test_dangling_targets_produce_no_edge() {
    let form = Form::new(
        "dangling",
        QuestionId(1),
        vec![Question::new(1, "Only", QuestionType::SingleChoice)
            .with_rule(Rule::when("x == 1").goto_question(50))
            .with_rule(Rule::when("x == 2").goto_result(60))
            .with_rule(Rule::fallback())],
        vec![],
    )
    .unwrap();
    let dot = form_to_dot(&form);
    assert_eq!(dot.matches(" -> ").count(), 0);
    assert!(dot.contains("Only"));
}
