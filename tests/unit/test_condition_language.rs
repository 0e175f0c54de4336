use triage::core::condition::{evaluate, AnswerValue, Condition, ConditionError, MAX_DEPTH};
use triage::core::error::AppError;
use triage::core::types::ErrorCategory;

fn choice(key: i64) -> AnswerValue {
    AnswerValue::Choice(key)
}

fn choices(keys: &[i64]) -> AnswerValue {
    AnswerValue::Choices(keys.to_vec())
}

fn text(value: &str) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

#[test]
fn test_comparison_aliases() {
    assert!(evaluate("x = 3", &choice(3)).unwrap());
    assert!(evaluate("x <> 4", &choice(3)).unwrap());
    assert!(evaluate("x != 3", &choice(4)).unwrap());
    assert!(evaluate("x < 4 && x <= 3", &choice(3)).unwrap());
}

#[test]
fn test_keywords_and_methods_ignore_case() {
    assert!(evaluate("x == 1 OR x == 2", &choice(2)).unwrap());
    assert!(evaluate("NOT (x == 1) And TRUE", &choice(2)).unwrap());
    assert!(evaluate("x.containsall([1, 3])", &choices(&[3, 1, 2])).unwrap());
    assert!(evaluate("x.STARTSWITH(\"he\")", &text("hello")).unwrap());
}

#[test]
fn test_negative_literals_cover_full_integer_range() {
    assert!(evaluate("x == -9223372036854775808", &choice(i64::MIN)).unwrap());
    assert!(evaluate("x == 9223372036854775807", &choice(i64::MAX)).unwrap());
    assert!(evaluate("x > -3 && x < 0", &choice(-1)).unwrap());
    assert!(evaluate("x in [-1, -2]", &choice(-2)).unwrap());
    assert!(evaluate("x == - 4", &choice(-4)).unwrap());
    assert!(evaluate("x == -(4)", &choice(-4)).unwrap());
}

#[test]
fn test_properties_without_parentheses() {
    assert!(evaluate("x.Count == 3", &choices(&[1, 2, 3])).unwrap());
    assert!(evaluate("x.Length == 5", &text("héllo")).unwrap());
    assert!(evaluate("x.Count() > 0", &choices(&[4])).unwrap());
}

#[test]
fn test_string_escapes() {
    assert!(evaluate(r#"x == "say \"hi\"""#, &text("say \"hi\"")).unwrap());
    assert!(evaluate(r"x == 'it\'s'", &text("it's")).unwrap());
    assert!(evaluate(r#"x == "a\\b""#, &text("a\\b")).unwrap());
}

#[test]
fn test_empty_selection_is_valid_list() {
    assert!(!evaluate("x.Any()", &choices(&[])).unwrap());
    assert!(evaluate("x == []", &choices(&[])).unwrap());
}

#[test]
fn test_only_x_is_bound() {
    for source in ["y == 1", "answer > 2", "env.Length > 0"] {
        let err = Condition::compile(source).unwrap_err();
        assert!(
            matches!(err, ConditionError::UnknownIdentifier(_)),
            "{} gave {:?}",
            source,
            err
        );
    }
}

#[test]
fn test_unknown_methods_and_arity_fail_to_compile() {
    assert!(matches!(
        Condition::compile("x.Exec(\"rm\")"),
        Err(ConditionError::UnknownMethod(_))
    ));
    assert!(matches!(
        Condition::compile("x.Contains()"),
        Err(ConditionError::Arity { .. })
    ));
    assert!(matches!(
        Condition::compile("x.Count(1)"),
        Err(ConditionError::Arity { .. })
    ));
}

#[test]
fn test_malformed_text_fails_to_compile() {
    for source in ["", "   ", "x ==", "(x == 1", "x & 1", "\"open", "x == 1 x", "99999999999999999999 > x"] {
        let err = Condition::compile(source).unwrap_err();
        assert_eq!(
            err.category(),
            ErrorCategory::ConditionCompilation,
            "{:?} gave {:?}",
            source,
            err
        );
    }
}

#[test]
fn test_nesting_is_capped() {
    let shallow = format!("{}x == 1{}", "(".repeat(MAX_DEPTH / 2), ")".repeat(MAX_DEPTH / 2));
    assert!(evaluate(&shallow, &choice(1)).unwrap());

    let deep = format!("{}x == 1{}", "(".repeat(MAX_DEPTH * 4), ")".repeat(MAX_DEPTH * 4));
    assert_eq!(
        Condition::compile(&deep),
        Err(ConditionError::TooDeep(MAX_DEPTH))
    );

    let negations = format!("{}x == 1", "!".repeat(MAX_DEPTH * 4));
    assert!(Condition::compile(&negations).is_err());
}

#[test]
fn test_shape_errors_are_type_mismatches() {
    let cases = [
        ("x.StartsWith(\"a\")", choice(1)),
        ("x > \"a\"", choice(1)),
        ("x.ContainsAll(1)", choices(&[1])),
        ("x == 1 and 2", choice(1)),
        ("x.Any()", text("abc")),
    ];
    for (source, answer) in cases {
        let err: AppError = evaluate(source, &answer).unwrap_err().into();
        assert_eq!(err.category, ErrorCategory::TypeMismatch, "{}", source);
        assert_eq!(err.code, "TRG-COND-002");
    }
}
