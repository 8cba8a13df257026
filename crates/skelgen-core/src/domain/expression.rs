//! Template expressions and the lexical scope they are evaluated in.
//!
//! ```text
//! expr    := unary (("==" | "!=") unary)?
//! unary   := ("!" | "not") unary | primary
//! primary := STRING | "true" | "false" | path | "(" expr ")"
//! path    := IDENT ("." IDENT)*          IDENT may end in '?'
//! ```
//!
//! Expressions are parsed once, when the template is parsed, and evaluated
//! many times against a [`Scope`].

use std::borrow::Cow;
use std::fmt;

use crate::domain::{
    error::{EvalError, SyntaxError},
    value::Value,
};

// ============================================================================
// Scope
// ============================================================================

/// Lexical environment: a stack of named bindings, innermost last.
#[derive(Debug, Clone, Default)]
pub struct Scope<'a> {
    bindings: Vec<(String, Value<'a>)>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Value<'a>) -> Self {
        self.push(name, value);
        self
    }

    /// Bind `name`, shadowing any outer binding until the matching `pop`.
    pub fn push(&mut self, name: impl Into<String>, value: Value<'a>) {
        self.bindings.push((name.into(), value));
    }

    pub fn pop(&mut self) {
        self.bindings.pop();
    }

    pub fn lookup(&self, name: &str) -> Option<&Value<'a>> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    pub fn depth(&self) -> usize {
        self.bindings.len()
    }
}

// ============================================================================
// AST
// ============================================================================

/// A dotted attribute path rooted at a scope binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    pub root: String,
    pub segments: Vec<String>,
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Str(String),
    Bool(bool),
    Path(PathExpr),
    Not(Box<Expr>),
    Compare {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Path(p) => write!(f, "{p}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::Compare {
                left,
                right,
                negated,
            } => write!(f, "{left} {} {right}", if *negated { "!=" } else { "==" }),
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

impl Expr {
    pub fn parse(src: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(src)?;
        let mut parser = Parser {
            src,
            tokens: &tokens,
            pos: 0,
        };
        let expr = parser.expr()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(parser.error(format!("unexpected {tok}"))),
        }
    }

    pub fn eval<'a>(&self, scope: &Scope<'a>) -> Result<Value<'a>, EvalError> {
        match self {
            Self::Str(s) => Ok(Value::owned(s.clone())),
            Self::Bool(b) => Ok(Value::Bool(*b)),
            Self::Path(path) => eval_path(path, scope),
            Self::Not(inner) => Ok(Value::Bool(!inner.eval_bool(scope)?)),
            Self::Compare {
                left,
                right,
                negated,
            } => {
                let equal = left.eval(scope)?.loose_eq(&right.eval(scope)?);
                Ok(Value::Bool(equal != *negated))
            }
        }
    }

    /// Evaluate as a guard.
    pub fn eval_bool(&self, scope: &Scope<'_>) -> Result<bool, EvalError> {
        let value = self.eval(scope)?;
        value.truthiness().ok_or_else(|| self.mismatch("a boolean", &value))
    }

    /// Evaluate for interpolation.
    pub fn eval_text<'a>(&self, scope: &Scope<'a>) -> Result<Cow<'a, str>, EvalError> {
        let value = self.eval(scope)?;
        value.to_text().ok_or_else(|| self.mismatch("a scalar", &value))
    }

    /// Evaluate as an iteration target.
    pub fn eval_list<'a>(&self, scope: &Scope<'a>) -> Result<Vec<Value<'a>>, EvalError> {
        match self.eval(scope)? {
            Value::List(items) => Ok(items),
            other => Err(self.mismatch("a list", &other)),
        }
    }

    fn mismatch(&self, expected: &'static str, found: &Value<'_>) -> EvalError {
        EvalError::TypeMismatch {
            path: self.to_string(),
            expected,
            found: found.kind_name(),
        }
    }
}

fn eval_path<'a>(path: &PathExpr, scope: &Scope<'a>) -> Result<Value<'a>, EvalError> {
    let unresolved = |segment: &str, on: &'static str| EvalError::UnresolvedPath {
        path: path.to_string(),
        segment: segment.to_string(),
        on,
    };

    let mut current = scope
        .lookup(&path.root)
        .cloned()
        .ok_or_else(|| unresolved(&path.root, "scope"))?;

    for segment in &path.segments {
        // `name?` is only valid on predicates.
        let (name, predicate) = match segment.strip_suffix('?') {
            Some(name) => (name, true),
            None => (segment.as_str(), false),
        };
        current = current
            .attr(name)
            .filter(|next| !predicate || matches!(next, Value::Bool(_)))
            .ok_or_else(|| unresolved(segment, current.kind_name()))?;
    }

    Ok(current)
}

// ============================================================================
// Lexer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Dot,
    Bang,
    EqEq,
    NotEq,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "'{name}'"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Dot => f.write_str("'.'"),
            Self::Bang => f.write_str("'!'"),
            Self::EqEq => f.write_str("'=='"),
            Self::NotEq => f.write_str("'!='"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    /// Byte offset in the source.
    start: usize,
}

fn invalid(src: &str, reason: impl Into<String>) -> SyntaxError {
    SyntaxError::InvalidExpression {
        expr: src.trim().to_string(),
        reason: reason.into(),
    }
}

fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '=' => match chars.next() {
                Some((_, '=')) => TokenKind::EqEq,
                _ => return Err(invalid(src, "expected '=='")),
            },
            '!' => match chars.peek() {
                Some((_, '=')) => {
                    chars.next();
                    TokenKind::NotEq
                }
                _ => TokenKind::Bang,
            },
            '"' | '\'' => {
                let quote = c;
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, escaped)) => value.push(escaped),
                            None => return Err(invalid(src, "unterminated string")),
                        },
                        Some((_, ch)) if ch == quote => break,
                        Some((_, ch)) => value.push(ch),
                        None => return Err(invalid(src, "unterminated string")),
                    }
                }
                TokenKind::Str(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        ident.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(&(_, '?')) = chars.peek() {
                    ident.push('?');
                    chars.next();
                }
                TokenKind::Ident(ident)
            }
            other => return Err(invalid(src, format!("unexpected character '{other}'"))),
        };
        tokens.push(Token { kind, start });
    }

    Ok(tokens)
}

/// Split `expr if guard` / `expr unless guard` at the first top-level
/// keyword. Returns the value part and, when present, the guard source with
/// a flag telling whether it is negated.
pub(crate) fn split_inline_guard(src: &str) -> Result<(&str, Option<(&str, bool)>), SyntaxError> {
    let tokens = tokenize(src)?;
    let mut depth = 0usize;
    for token in &tokens {
        match &token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            TokenKind::Ident(word) if depth == 0 && (word == "if" || word == "unless") => {
                let guard = &src[token.start + word.len()..];
                return Ok((&src[..token.start], Some((guard, word == "unless"))));
            }
            _ => {}
        }
    }
    Ok((src, None))
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'s, 't> {
    src: &'s str,
    tokens: &'t [Token],
    pos: usize,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| t.kind.clone());
        self.pos += 1;
        token
    }

    fn error(&self, reason: impl Into<String>) -> SyntaxError {
        invalid(self.src, reason)
    }

    fn expr(&mut self) -> Result<Expr, SyntaxError> {
        let left = self.unary()?;
        let negated = match self.peek() {
            Some(TokenKind::EqEq) => false,
            Some(TokenKind::NotEq) => true,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.unary()?;
        Ok(Expr::Compare {
            left: Box::new(left),
            right: Box::new(right),
            negated,
        })
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let negation = match self.peek() {
            Some(TokenKind::Bang) => true,
            Some(TokenKind::Ident(word)) => word == "not",
            _ => false,
        };
        if negation {
            self.pos += 1;
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        match self.next() {
            Some(TokenKind::Str(s)) => Ok(Expr::Str(s)),
            Some(TokenKind::Ident(word)) if word == "true" => Ok(Expr::Bool(true)),
            Some(TokenKind::Ident(word)) if word == "false" => Ok(Expr::Bool(false)),
            Some(TokenKind::Ident(root)) => self.path(root),
            Some(TokenKind::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(TokenKind::RParen) => Ok(inner),
                    _ => Err(self.error("expected ')'")),
                }
            }
            Some(other) => Err(self.error(format!("unexpected {other}"))),
            None => Err(self.error("expected an expression")),
        }
    }

    fn path(&mut self, root: String) -> Result<Expr, SyntaxError> {
        if root.ends_with('?') {
            return Err(self.error(format!("'{root}' is not a binding name")));
        }
        let mut segments = Vec::new();
        while let Some(TokenKind::Dot) = self.peek() {
            self.pos += 1;
            match self.next() {
                Some(TokenKind::Ident(segment)) => segments.push(segment),
                _ => return Err(self.error("expected an attribute name after '.'")),
            }
        }
        Ok(Expr::Path(PathExpr { root, segments }))
    }
}
