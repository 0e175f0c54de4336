use super::ConditionError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Minus,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(value) => write!(f, "integer {}", value),
            TokenKind::Str(value) => write!(f, "string {:?}", value),
            TokenKind::Ident(name) => write!(f, "'{}'", name),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Dot => f.write_str("'.'"),
            TokenKind::Minus => f.write_str("'-'"),
            TokenKind::Eq => f.write_str("'=='"),
            TokenKind::Ne => f.write_str("'!='"),
            TokenKind::Lt => f.write_str("'<'"),
            TokenKind::Le => f.write_str("'<='"),
            TokenKind::Gt => f.write_str("'>'"),
            TokenKind::Ge => f.write_str("'>='"),
            TokenKind::AndAnd => f.write_str("'&&'"),
            TokenKind::OrOr => f.write_str("'||'"),
            TokenKind::Bang => f.write_str("'!'"),
            TokenKind::Eof => f.write_str("end of condition"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token start in the condition text.
    pub offset: usize,
}

/// Split condition text into tokens. The returned vector always ends with `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match ch {
            '0'..='9' => {
                let value = read_int(&mut chars, String::new())?;
                tokens.push(Token {
                    kind: TokenKind::Int(value),
                    offset,
                });
                continue;
            }
            // A minus directly before digits in operand position is part of
            // the literal, so the full i64 range is writable.
            '-' if !ends_value(tokens.last())
                && source[offset + 1..].starts_with(|c: char| c.is_ascii_digit()) =>
            {
                chars.next();
                let value = read_int(&mut chars, String::from("-"))?;
                tokens.push(Token {
                    kind: TokenKind::Int(value),
                    offset,
                });
                continue;
            }
            '"' | '\'' => {
                chars.next();
                let text = read_string(&mut chars, ch, offset)?;
                tokens.push(Token {
                    kind: TokenKind::Str(text),
                    offset,
                });
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(name),
                    offset,
                });
                continue;
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '=' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Eq,
                    offset,
                });
                continue;
            }
            '!' => {
                chars.next();
                let kind = if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    TokenKind::Ne
                } else {
                    TokenKind::Bang
                };
                tokens.push(Token { kind, offset });
                continue;
            }
            '<' => {
                chars.next();
                let kind = match chars.peek() {
                    Some(&(_, '=')) => {
                        chars.next();
                        TokenKind::Le
                    }
                    Some(&(_, '>')) => {
                        chars.next();
                        TokenKind::Ne
                    }
                    _ => TokenKind::Lt,
                };
                tokens.push(Token { kind, offset });
                continue;
            }
            '>' => {
                chars.next();
                let kind = if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                };
                tokens.push(Token { kind, offset });
                continue;
            }
            '&' | '|' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, next)) if next == ch => {
                        chars.next();
                    }
                    _ => return Err(ConditionError::UnexpectedChar { ch, offset }),
                }
                let kind = if ch == '&' {
                    TokenKind::AndAnd
                } else {
                    TokenKind::OrOr
                };
                tokens.push(Token { kind, offset });
                continue;
            }
            _ => return Err(ConditionError::UnexpectedChar { ch, offset }),
        };

        chars.next();
        tokens.push(Token { kind, offset });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        offset: source.len(),
    });
    Ok(tokens)
}

fn read_int(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    mut digits: String,
) -> Result<i64, ConditionError> {
    while let Some(&(_, c)) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    digits
        .parse::<i64>()
        .map_err(|_| ConditionError::IntegerOutOfRange(digits.clone()))
}

fn ends_value(previous: Option<&Token>) -> bool {
    matches!(
        previous.map(|token| &token.kind),
        Some(
            TokenKind::Int(_)
                | TokenKind::Str(_)
                | TokenKind::Ident(_)
                | TokenKind::RParen
                | TokenKind::RBracket
        )
    )
}

fn read_string(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, ConditionError> {
    let mut text = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped @ ('"' | '\'' | '\\'))) => text.push(escaped),
                Some((offset, other)) => {
                    return Err(ConditionError::UnexpectedChar { ch: other, offset })
                }
                None => break,
            },
            c if c == quote => return Ok(text),
            c => text.push(c),
        }
    }
    Err(ConditionError::UnterminatedString(start))
}
