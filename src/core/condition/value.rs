use super::parser::{CompareOp, Expr, Method};
use super::ConditionError;
use std::cmp::Ordering;
use std::fmt;

/// Parsed answer bound to `x` while a condition runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    Text(String),
    Choice(i64),
    Choices(Vec<i64>),
}

impl AnswerValue {
    fn to_value(&self) -> Value {
        match self {
            AnswerValue::Text(text) => Value::Str(text.clone()),
            AnswerValue::Choice(key) => Value::Int(*key),
            AnswerValue::Choices(keys) => Value::List(keys.iter().copied().map(Value::Int).collect()),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Text(text) => write!(f, "{:?}", text),
            AnswerValue::Choice(key) => write!(f, "{}", key),
            AnswerValue::Choices(keys) => {
                let joined: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

/// Runtime value produced while evaluating an operator tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
        }
    }
}

fn mismatch(message: String) -> ConditionError {
    ConditionError::TypeMismatch(message)
}

fn expect_bool(value: Value, context: &str) -> Result<bool, ConditionError> {
    match value {
        Value::Bool(flag) => Ok(flag),
        other => Err(mismatch(format!(
            "{} expects bool, got {}",
            context,
            other.type_name()
        ))),
    }
}

fn strict_eq(left: &Value, right: &Value) -> Result<bool, ConditionError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (x, y) in a.iter().zip(b) {
                if !strict_eq(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Err(mismatch(format!(
            "cannot compare {} with {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn ordering(left: &Value, right: &Value) -> Result<Ordering, ConditionError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => Err(mismatch(format!(
            "cannot order {} against {}",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn list_contains(items: &[Value], needle: &Value) -> Result<bool, ConditionError> {
    for item in items {
        if strict_eq(item, needle)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn contains(haystack: &Value, needle: &Value) -> Result<bool, ConditionError> {
    match (haystack, needle) {
        (Value::List(items), _) => list_contains(items, needle),
        (Value::Str(text), Value::Str(part)) => Ok(text.contains(part.as_str())),
        _ => Err(mismatch(format!(
            "cannot look for {} in {}",
            needle.type_name(),
            haystack.type_name()
        ))),
    }
}

/// Evaluate `expr` with `x` bound to `answer`.
pub(super) fn eval(expr: &Expr, answer: &AnswerValue) -> Result<Value, ConditionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Answer => Ok(answer.to_value()),
        Expr::List(items) => items
            .iter()
            .map(|item| eval(item, answer))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Neg(operand) => match eval(operand, answer)? {
            Value::Int(value) => value
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| mismatch(format!("cannot negate {}", value))),
            other => Err(mismatch(format!("cannot negate {}", other.type_name()))),
        },
        Expr::Not(operand) => Ok(Value::Bool(!expect_bool(eval(operand, answer)?, "'not'")?)),
        Expr::And(operands) => {
            for operand in operands {
                if !expect_bool(eval(operand, answer)?, "'and'")? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        Expr::Or(operands) => {
            for operand in operands {
                if expect_bool(eval(operand, answer)?, "'or'")? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Expr::Compare(op, left, right) => {
            let left = eval(left, answer)?;
            let right = eval(right, answer)?;
            let outcome = match op {
                CompareOp::Eq => strict_eq(&left, &right)?,
                CompareOp::Ne => !strict_eq(&left, &right)?,
                CompareOp::Lt => ordering(&left, &right)? == Ordering::Less,
                CompareOp::Le => ordering(&left, &right)? != Ordering::Greater,
                CompareOp::Gt => ordering(&left, &right)? == Ordering::Greater,
                CompareOp::Ge => ordering(&left, &right)? != Ordering::Less,
            };
            Ok(Value::Bool(outcome))
        }
        Expr::In(needle, haystack) => {
            let needle = eval(needle, answer)?;
            let haystack = eval(haystack, answer)?;
            contains(&haystack, &needle).map(Value::Bool)
        }
        Expr::Call {
            target,
            method,
            args,
        } => {
            let target = eval(target, answer)?;
            let args = args
                .iter()
                .map(|arg| eval(arg, answer))
                .collect::<Result<Vec<_>, _>>()?;
            call(&target, *method, &args)
        }
    }
}

fn call(target: &Value, method: Method, args: &[Value]) -> Result<Value, ConditionError> {
    let unsupported = || {
        mismatch(format!(
            "{} is not available on {}",
            method.name(),
            target.type_name()
        ))
    };
    match (method, target) {
        (Method::Contains, Value::List(_) | Value::Str(_)) => {
            contains(target, &args[0]).map(Value::Bool)
        }
        (Method::ContainsAll | Method::ContainsAny, Value::List(items)) => {
            let wanted = match &args[0] {
                Value::List(wanted) => wanted,
                other => {
                    return Err(mismatch(format!(
                        "{} expects a list argument, got {}",
                        method.name(),
                        other.type_name()
                    )))
                }
            };
            let mut hits = 0;
            for value in wanted {
                if list_contains(items, value)? {
                    hits += 1;
                }
            }
            Ok(Value::Bool(if method == Method::ContainsAll {
                hits == wanted.len()
            } else {
                hits > 0
            }))
        }
        (Method::StartsWith | Method::EndsWith, Value::Str(text)) => match &args[0] {
            Value::Str(part) => Ok(Value::Bool(if method == Method::StartsWith {
                text.starts_with(part.as_str())
            } else {
                text.ends_with(part.as_str())
            })),
            other => Err(mismatch(format!(
                "{} expects a string argument, got {}",
                method.name(),
                other.type_name()
            ))),
        },
        (Method::Count | Method::Length, Value::List(items)) => Ok(Value::Int(items.len() as i64)),
        (Method::Length, Value::Str(text)) => Ok(Value::Int(text.chars().count() as i64)),
        (Method::Any, Value::List(items)) => Ok(Value::Bool(!items.is_empty())),
        _ => Err(unsupported()),
    }
}
