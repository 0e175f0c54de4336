use super::lexer::{tokenize, Token, TokenKind};
use super::value::Value;
use super::ConditionError;

/// Maximum nesting of unary operators, parentheses, list literals and
/// method chains in a single condition.
pub const MAX_DEPTH: usize = 64;

/// The only name a condition may reference.
pub const ANSWER_VARIABLE: &str = "x";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Contains,
    ContainsAll,
    ContainsAny,
    StartsWith,
    EndsWith,
    Count,
    Any,
    Length,
}

impl Method {
    fn lookup(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "contains" => Some(Method::Contains),
            "containsall" => Some(Method::ContainsAll),
            "containsany" => Some(Method::ContainsAny),
            "startswith" => Some(Method::StartsWith),
            "endswith" => Some(Method::EndsWith),
            "count" => Some(Method::Count),
            "any" => Some(Method::Any),
            "length" => Some(Method::Length),
            _ => None,
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Method::Contains
            | Method::ContainsAll
            | Method::ContainsAny
            | Method::StartsWith
            | Method::EndsWith => 1,
            Method::Count | Method::Any | Method::Length => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Contains => "Contains",
            Method::ContainsAll => "ContainsAll",
            Method::ContainsAny => "ContainsAny",
            Method::StartsWith => "StartsWith",
            Method::EndsWith => "EndsWith",
            Method::Count => "Count",
            Method::Any => "Any",
            Method::Length => "Length",
        }
    }
}

/// Operator tree produced by [`parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Answer,
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    In(Box<Expr>, Box<Expr>),
    Call {
        target: Box<Expr>,
        method: Method,
        args: Vec<Expr>,
    },
}

/// Parse condition text into an operator tree.
pub fn parse(source: &str) -> Result<Expr, ConditionError> {
    let tokens = tokenize(source)?;
    if matches!(tokens.first().map(|t| &t.kind), Some(TokenKind::Eof)) {
        return Err(ConditionError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;
    parser.expect(TokenKind::Eof, "end of condition")?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // `tokenize` always terminates the stream with Eof, and `advance`
        // never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name.eq_ignore_ascii_case(keyword))
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, ConditionError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ConditionError {
        let token = self.peek();
        ConditionError::UnexpectedToken {
            found: token.kind.to_string(),
            expected,
            offset: token.offset,
        }
    }

    fn enter(&mut self) -> Result<(), ConditionError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ConditionError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_or(&mut self) -> Result<Expr, ConditionError> {
        let mut operands = vec![self.parse_and()?];
        while self.check(&TokenKind::OrOr) || self.check_keyword("or") {
            self.advance();
            operands.push(self.parse_and()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::Or(operands)
        })
    }

    fn parse_and(&mut self) -> Result<Expr, ConditionError> {
        let mut operands = vec![self.parse_unary()?];
        while self.check(&TokenKind::AndAnd) || self.check_keyword("and") {
            self.advance();
            operands.push(self.parse_unary()?);
        }
        Ok(if operands.len() == 1 {
            operands.remove(0)
        } else {
            Expr::And(operands)
        })
    }

    fn parse_unary(&mut self) -> Result<Expr, ConditionError> {
        if self.check(&TokenKind::Bang) || self.check_keyword("not") {
            self.advance();
            self.enter()?;
            let operand = self.parse_unary()?;
            self.leave();
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ConditionError> {
        let left = self.parse_membership()?;
        let op = match self.peek().kind {
            TokenKind::Eq => CompareOp::Eq,
            TokenKind::Ne => CompareOp::Ne,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Le => CompareOp::Le,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Ge => CompareOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_membership()?;
        Ok(Expr::Compare(op, Box::new(left), Box::new(right)))
    }

    fn parse_membership(&mut self) -> Result<Expr, ConditionError> {
        let needle = self.parse_postfix()?;
        if self.check_keyword("in") {
            self.advance();
            let haystack = self.parse_postfix()?;
            return Ok(Expr::In(Box::new(needle), Box::new(haystack)));
        }
        Ok(needle)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ConditionError> {
        let mut expr = self.parse_primary()?;
        let mut chain = 0;
        while self.check(&TokenKind::Dot) {
            self.advance();
            self.enter()?;
            chain += 1;
            let name = match &self.peek().kind {
                TokenKind::Ident(name) => name.clone(),
                _ => return Err(self.unexpected("method name")),
            };
            self.advance();
            let method =
                Method::lookup(&name).ok_or_else(|| ConditionError::UnknownMethod(name.clone()))?;
            let args = if self.check(&TokenKind::LParen) {
                self.advance();
                self.parse_arguments(TokenKind::RParen, "')'")?
            } else {
                Vec::new()
            };
            if args.len() != method.arity() {
                return Err(ConditionError::Arity {
                    method: method.name(),
                    expected: method.arity(),
                    found: args.len(),
                });
            }
            expr = Expr::Call {
                target: Box::new(expr),
                method,
                args,
            };
        }
        self.depth -= chain;
        Ok(expr)
    }

    fn parse_arguments(
        &mut self,
        close: TokenKind,
        expected: &'static str,
    ) -> Result<Vec<Expr>, ConditionError> {
        let mut items = Vec::new();
        if self.check(&close) {
            self.advance();
            return Ok(items);
        }
        self.enter()?;
        loop {
            items.push(self.parse_or()?);
            if self.check(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            self.expect(close, expected)?;
            break;
        }
        self.leave();
        Ok(items)
    }

    fn parse_primary(&mut self) -> Result<Expr, ConditionError> {
        let starts_value = matches!(
            self.peek().kind,
            TokenKind::Int(_)
                | TokenKind::Str(_)
                | TokenKind::Minus
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Ident(_)
        );
        if !starts_value {
            return Err(self.unexpected("a value"));
        }
        match self.advance().kind {
            TokenKind::Int(value) => Ok(Expr::Literal(Value::Int(value))),
            TokenKind::Str(text) => Ok(Expr::Literal(Value::Str(text))),
            TokenKind::Minus => {
                self.enter()?;
                let operand = self.parse_primary()?;
                self.leave();
                Ok(Expr::Neg(Box::new(operand)))
            }
            TokenKind::LParen => {
                self.enter()?;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RParen, "')'")?;
                self.leave();
                Ok(inner)
            }
            TokenKind::LBracket => {
                let items = self.parse_arguments(TokenKind::RBracket, "']'")?;
                Ok(Expr::List(items))
            }
            TokenKind::Ident(name) => {
                if name.eq_ignore_ascii_case("true") {
                    Ok(Expr::Literal(Value::Bool(true)))
                } else if name.eq_ignore_ascii_case("false") {
                    Ok(Expr::Literal(Value::Bool(false)))
                } else if name == ANSWER_VARIABLE {
                    Ok(Expr::Answer)
                } else {
                    Err(ConditionError::UnknownIdentifier(name))
                }
            }
            _ => Err(self.unexpected("a value")),
        }
    }
}
