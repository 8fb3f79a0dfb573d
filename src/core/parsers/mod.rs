//! Static PHP source analysis.
//!
//! - `lexer`: tokenizer
//! - `expr`: constant-expression parser (property defaults, class constants)
//! - `classes`: structural parser that finds class declarations

pub mod classes;
pub mod expr;
pub mod lexer;

use std::collections::HashMap;

use lexer::{Token, TokenKind};

use crate::core::error::ParseError;

/// Forward-only view over a token stream.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    pub fn peek_nth(&self, n: usize) -> Option<&'a TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    /// The token just consumed, if any.
    pub fn previous(&self) -> Option<&'a TokenKind> {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| &t.kind)
    }

    pub fn bump(&mut self) -> Option<&'a TokenKind> {
        let token = self.tokens.get(self.pos).map(|t| &t.kind);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Line of the current token, or of the last token at end of input.
    pub fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line(), message)
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        matches!(self.peek(), Some(TokenKind::Symbol(s)) if *s == symbol)
    }

    /// Keywords are case-insensitive in PHP.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(TokenKind::Name(n)) if n.eq_ignore_ascii_case(keyword))
    }

    pub fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.is_symbol(symbol) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.is_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect_symbol(&mut self, symbol: &str) -> Result<(), ParseError> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", symbol)))
        }
    }

    pub fn eat_name(&mut self) -> Option<&'a str> {
        match self.peek() {
            Some(TokenKind::Name(name)) => {
                self.pos += 1;
                Some(name.as_str())
            }
            _ => None,
        }
    }

    /// Consume a bracketed group starting at the current `(`, `[`, `{` or `#[`,
    /// including everything nested inside it.
    pub fn skip_balanced(&mut self) -> Result<(), ParseError> {
        let start = self.line();
        let mut stack: Vec<&'static str> = Vec::new();
        loop {
            let Some(token) = self.bump() else {
                return Err(ParseError::new(start, "unbalanced brackets"));
            };
            match token {
                TokenKind::Symbol("(") => stack.push(")"),
                TokenKind::Symbol("[") | TokenKind::AttributeStart => stack.push("]"),
                TokenKind::Symbol("{") => stack.push("}"),
                TokenKind::Symbol(close @ (")" | "]" | "}")) => {
                    if stack.pop() != Some(*close) {
                        return Err(self.error(format!("unexpected '{}'", close)));
                    }
                }
                _ => {}
            }
            if stack.is_empty() {
                return Ok(());
            }
        }
    }
}

/// Resolves class names the way PHP does at compile time: against the
/// current namespace and the file's `use` imports.
#[derive(Debug, Clone, Default)]
pub struct NameResolver {
    namespace: String,
    /// Lowercased alias to fully-qualified name.
    imports: HashMap<String, String>,
}

impl NameResolver {
    /// Enter a new namespace; imports do not carry across namespaces.
    pub fn enter_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.trim_start_matches('\\').to_string();
        self.imports.clear();
    }

    pub fn import(&mut self, name: &str, alias: Option<&str>) {
        let name = name.trim_start_matches('\\');
        let alias = alias.unwrap_or_else(|| name.rsplit('\\').next().unwrap_or(name));
        self.imports
            .insert(alias.to_ascii_lowercase(), name.to_string());
    }

    /// Fully-qualified name for a class reference as written in source.
    pub fn resolve(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }
        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if first.eq_ignore_ascii_case("namespace") {
            return self.qualify(rest.unwrap_or_default());
        }
        if let Some(imported) = self.imports.get(&first.to_ascii_lowercase()) {
            return match rest {
                Some(rest) => format!("{}\\{}", imported, rest),
                None => imported.clone(),
            };
        }
        self.qualify(name)
    }

    /// Prefix a declared name with the current namespace.
    pub fn qualify(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }
}
