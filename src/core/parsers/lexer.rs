//! A permissive PHP tokenizer.
//!
//! Only what the structural class parser and the constant-expression parser
//! need is distinguished: names, variables, literals and punctuation. Inline
//! HTML, whitespace and comments are dropped. String literals are delivered
//! with their escapes already processed.

use crate::core::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier, keyword or qualified name, e.g. `Zend\Validator\Between`.
    Name(String),
    /// `$name`, without the dollar sign.
    Variable(String),
    Str(String),
    /// A double-quoted or heredoc string containing variable interpolation.
    Interpolated,
    Int(i64),
    Float(f64),
    Symbol(&'static str),
    /// The `#[` that opens an attribute group.
    AttributeStart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

/// Multi-character operators, longest first.
const MULTI_CHAR_SYMBOLS: &[&str] = &[
    "...", "?->", "<=>", "===", "!==", "**=", "??=", "::", "=>", "->", "??", "==", "!=", "<>",
    "<=", ">=", "&&", "||", "++", "--", ".=", "+=", "-=", "*=", "/=", "%=", "**", "<<", ">>",
];

const SINGLE_CHAR_SYMBOLS: &[&str] = &[
    "(", ")", "[", "]", "{", "}", ";", ",", "=", ".", "+", "-", "*", "/", "%", "!", "?", ":", "<",
    ">", "&", "|", "^", "~", "@", "\\", "$", "`",
];

pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source, true).tokenize()
}

/// Tokenize a data file: `$` inside double-quoted and heredoc strings is
/// literal text, so a generated message table never reads as `Interpolated`.
pub fn tokenize_data(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source, false).tokenize()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
    interpolation: bool,
}

impl Lexer {
    fn new(source: &str, interpolation: bool) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            interpolation,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        self.skip_inline_html();
        while let Some(c) = self.current() {
            let line = self.line;
            match c {
                '\n' | ' ' | '\t' | '\r' | '\x0b' | '\x0c' => self.bump(),
                '?' if self.next() == Some('>') => {
                    self.bump_n(2);
                    // A closing tag terminates the statement.
                    self.push(TokenKind::Symbol(";"), line);
                    self.skip_inline_html();
                }
                '#' if self.next() == Some('[') => {
                    self.bump_n(2);
                    self.push(TokenKind::AttributeStart, line);
                }
                '#' => self.skip_line_comment(),
                '/' if self.next() == Some('/') => self.skip_line_comment(),
                '/' if self.next() == Some('*') => self.skip_block_comment()?,
                '\'' => {
                    let value = self.lex_single_quoted()?;
                    self.push(TokenKind::Str(value), line);
                }
                '"' => {
                    let kind = self.lex_double_quoted()?;
                    self.push(kind, line);
                }
                '<' if self.starts_with("<<<") => {
                    let kind = self.lex_heredoc()?;
                    self.push(kind, line);
                }
                '$' if self.next().is_some_and(is_name_start) => {
                    self.bump();
                    let name = self.read_identifier();
                    self.push(TokenKind::Variable(name), line);
                }
                c if c.is_ascii_digit() => {
                    let kind = self.lex_number()?;
                    self.push(kind, line);
                }
                '.' if self.next().is_some_and(|n| n.is_ascii_digit()) => {
                    let kind = self.lex_number()?;
                    self.push(kind, line);
                }
                c if is_name_start(c) => {
                    let name = self.read_name();
                    self.push(TokenKind::Name(name), line);
                }
                '\\' if self.next().is_some_and(is_name_start) => {
                    let name = self.read_name();
                    self.push(TokenKind::Name(name), line);
                }
                _ => {
                    let symbol = self.lex_symbol()?;
                    self.push(TokenKind::Symbol(symbol), line);
                }
            }
        }
        Ok(self.tokens)
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) {
        if let Some(c) = self.current() {
            if c == '\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }

    fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut i = self.pos;
        for expected in s.chars() {
            match self.chars.get(i) {
                Some(c) if *c == expected => i += 1,
                _ => return false,
            }
        }
        true
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        let mut i = self.pos;
        for expected in s.chars() {
            match self.chars.get(i) {
                Some(c) if c.eq_ignore_ascii_case(&expected) => i += 1,
                _ => return false,
            }
        }
        true
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, message)
    }

    /// Skip text outside `<?php ... ?>` up to and including the next open tag.
    fn skip_inline_html(&mut self) {
        while self.current().is_some() {
            if self.starts_with_ignore_case("<?php") {
                self.bump_n(5);
                return;
            }
            if self.starts_with("<?=") {
                self.bump_n(3);
                return;
            }
            if self.starts_with("<?") {
                self.bump_n(2);
                return;
            }
            self.bump();
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' || self.starts_with("?>") {
                return;
            }
            self.bump();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.line;
        self.bump_n(2);
        while self.current().is_some() {
            if self.starts_with("*/") {
                self.bump_n(2);
                return Ok(());
            }
            self.bump();
        }
        Err(ParseError::new(start, "unterminated block comment"))
    }

    fn read_identifier(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.current() {
            if !is_name_continue(c) {
                break;
            }
            name.push(c);
            self.bump();
        }
        name
    }

    /// Read a possibly qualified name such as `\Foo\Bar`.
    fn read_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            if self.current() == Some('\\') && self.next().is_some_and(is_name_start) {
                name.push('\\');
                self.bump();
            }
            name.push_str(&self.read_identifier());
            if !(self.current() == Some('\\') && self.next().is_some_and(is_name_start)) {
                return name;
            }
        }
    }

    fn lex_single_quoted(&mut self) -> Result<String, ParseError> {
        let start = self.line;
        self.bump();
        let mut value = String::new();
        while let Some(c) = self.current() {
            match c {
                '\'' => {
                    self.bump();
                    return Ok(value);
                }
                '\\' if matches!(self.next(), Some('\'') | Some('\\')) => {
                    self.bump();
                    if let Some(escaped) = self.current() {
                        value.push(escaped);
                    }
                    self.bump();
                }
                _ => {
                    value.push(c);
                    self.bump();
                }
            }
        }
        Err(ParseError::new(start, "unterminated string literal"))
    }

    fn lex_double_quoted(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.line;
        self.bump();
        let mut raw = String::new();
        while let Some(c) = self.current() {
            match c {
                '"' => {
                    self.bump();
                    return Ok(unescape_double_quoted(&raw, '"', self.interpolation));
                }
                '\\' => {
                    raw.push(c);
                    self.bump();
                    if let Some(escaped) = self.current() {
                        raw.push(escaped);
                        self.bump();
                    }
                }
                _ => {
                    raw.push(c);
                    self.bump();
                }
            }
        }
        Err(ParseError::new(start, "unterminated string literal"))
    }

    /// Heredoc and nowdoc, including the flexible closing marker: the
    /// marker's indentation is removed from every body line.
    fn lex_heredoc(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.line;
        self.bump_n(3);
        while matches!(self.current(), Some(' ') | Some('\t')) {
            self.bump();
        }
        let quote = match self.current() {
            Some(q @ ('\'' | '"')) => {
                self.bump();
                Some(q)
            }
            _ => None,
        };
        if !self.current().is_some_and(is_name_start) {
            return Err(self.error("invalid heredoc label"));
        }
        let label = self.read_identifier();
        if let Some(q) = quote {
            if self.current() != Some(q) {
                return Err(self.error("invalid heredoc label"));
            }
            self.bump();
        }
        if self.current() == Some('\r') {
            self.bump();
        }
        if self.current() != Some('\n') {
            return Err(self.error("expected newline after heredoc label"));
        }
        self.bump();

        let mut lines: Vec<String> = Vec::new();
        loop {
            if self.current().is_none() {
                return Err(ParseError::new(start, "unterminated heredoc"));
            }
            let mut line = String::new();
            while let Some(c) = self.current() {
                if c == '\n' {
                    break;
                }
                line.push(c);
                self.bump();
            }

            let trimmed = line.trim_start_matches([' ', '\t']);
            let is_closing = trimmed.starts_with(label.as_str())
                && !trimmed[label.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_name_continue);
            if is_closing {
                let indent = line.len() - trimmed.len();
                // Rewind to just after the label so trailing tokens are lexed.
                let rest = trimmed[label.len()..].chars().count();
                self.pos -= rest;
                let body = lines
                    .iter()
                    .map(|l| strip_indent(l, indent))
                    .collect::<Vec<_>>()
                    .join("\n");
                return Ok(if quote == Some('\'') {
                    TokenKind::Str(body)
                } else {
                    unescape_double_quoted(&body, '\0', self.interpolation)
                });
            }

            lines.push(line.trim_end_matches('\r').to_string());
            if self.current() == Some('\n') {
                self.bump();
            }
        }
    }

    fn lex_number(&mut self) -> Result<TokenKind, ParseError> {
        let radix = match (self.current(), self.next()) {
            (Some('0'), Some('x' | 'X')) => Some(16),
            (Some('0'), Some('b' | 'B')) => Some(2),
            (Some('0'), Some('o' | 'O')) => Some(8),
            _ => None,
        };
        if let Some(radix) = radix {
            self.bump_n(2);
            let mut digits = String::new();
            while let Some(c) = self.current() {
                if c == '_' {
                    self.bump();
                } else if c.is_digit(radix) {
                    digits.push(c);
                    self.bump();
                } else {
                    break;
                }
            }
            return i64::from_str_radix(&digits, radix)
                .map(TokenKind::Int)
                .map_err(|_| self.error("invalid number literal"));
        }

        let mut text = String::new();
        let mut is_float = false;
        self.read_digits(&mut text);
        if self.current() == Some('.') && self.next() != Some('.') {
            is_float = true;
            text.push('.');
            self.bump();
            self.read_digits(&mut text);
        }
        if matches!(self.current(), Some('e' | 'E')) {
            let has_exponent = match self.next() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => self
                    .chars
                    .get(self.pos + 2)
                    .is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if has_exponent {
                is_float = true;
                text.push('e');
                self.bump();
                if let Some(sign @ ('+' | '-')) = self.current() {
                    text.push(sign);
                    self.bump();
                }
                self.read_digits(&mut text);
            }
        }

        if is_float {
            return text
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error("invalid number literal"));
        }
        let parsed = if text.len() > 1 && text.starts_with('0') {
            i64::from_str_radix(&text[1..], 8)
        } else {
            text.parse::<i64>()
        };
        match parsed {
            Ok(value) => Ok(TokenKind::Int(value)),
            // Integer overflow turns into a float, like PHP does.
            Err(_) => text
                .parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.error("invalid number literal")),
        }
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(c) = self.current() {
            if c == '_' {
                self.bump();
            } else if c.is_ascii_digit() {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
    }

    fn lex_symbol(&mut self) -> Result<&'static str, ParseError> {
        for symbol in MULTI_CHAR_SYMBOLS.iter().chain(SINGLE_CHAR_SYMBOLS) {
            if self.starts_with(symbol) {
                self.bump_n(symbol.chars().count());
                return Ok(*symbol);
            }
        }
        let c = self.current().unwrap_or('\0');
        Err(self.error(format!("unexpected character '{}'", c.escape_default())))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let strippable = line
        .char_indices()
        .take_while(|(i, c)| *i < indent && matches!(c, ' ' | '\t'))
        .count();
    &line[strippable..]
}

/// Process double-quoted escape sequences. `quote` is the delimiter that may
/// appear escaped (`'\0'` for heredoc bodies). Octal and hex escapes produce
/// raw bytes; the result is decoded as UTF-8 with invalid sequences replaced.
fn unescape_double_quoted(raw: &str, quote: char, interpolation: bool) -> TokenKind {
    let chars: Vec<char> = raw.chars().collect();
    let mut bytes: Vec<u8> = Vec::with_capacity(raw.len());
    let mut utf8 = [0u8; 4];
    let mut push = |bytes: &mut Vec<u8>, c: char| {
        bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    };
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '$' if interpolation
                && chars.get(i + 1).is_some_and(|n| is_name_start(*n) || *n == '{') =>
            {
                return TokenKind::Interpolated;
            }
            '{' if interpolation && chars.get(i + 1) == Some(&'$') => {
                return TokenKind::Interpolated;
            }
            '\\' if i + 1 < chars.len() => {
                let escaped = chars[i + 1];
                i += 2;
                match escaped {
                    'n' => bytes.push(b'\n'),
                    't' => bytes.push(b'\t'),
                    'r' => bytes.push(b'\r'),
                    'v' => bytes.push(0x0b),
                    'e' => bytes.push(0x1b),
                    'f' => bytes.push(0x0c),
                    '\\' => bytes.push(b'\\'),
                    '$' => bytes.push(b'$'),
                    q if q == quote => push(&mut bytes, q),
                    '0'..='7' => {
                        let mut code = escaped.to_digit(8).unwrap_or(0);
                        let mut taken = 0;
                        while taken < 2 {
                            match chars.get(i).and_then(|d| d.to_digit(8)) {
                                Some(d) => {
                                    code = code * 8 + d;
                                    i += 1;
                                    taken += 1;
                                }
                                None => break,
                            }
                        }
                        bytes.push((code & 0xff) as u8);
                    }
                    'x' if chars.get(i).is_some_and(|d| d.is_ascii_hexdigit()) => {
                        let mut code = 0;
                        let mut taken = 0;
                        while taken < 2 {
                            match chars.get(i).and_then(|d| d.to_digit(16)) {
                                Some(d) => {
                                    code = code * 16 + d;
                                    i += 1;
                                    taken += 1;
                                }
                                None => break,
                            }
                        }
                        bytes.push(code as u8);
                    }
                    'u' if chars.get(i) == Some(&'{') => {
                        let hex: String = chars[i + 1..].iter().take_while(|d| **d != '}').collect();
                        match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                            Some(decoded) if chars.get(i + 1 + hex.len()) == Some(&'}') => {
                                push(&mut bytes, decoded);
                                i += hex.len() + 2;
                            }
                            _ => bytes.extend_from_slice(b"\\u"),
                        }
                    }
                    other => {
                        bytes.push(b'\\');
                        push(&mut bytes, other);
                    }
                }
                continue;
            }
            _ => push(&mut bytes, c),
        }
        i += 1;
    }
    TokenKind::Str(String::from_utf8_lossy(&bytes).into_owned())
}
