//! Parser for the constant expressions PHP allows as property defaults and
//! class constant values.
//!
//! Anything outside that narrow shape is kept as `Expr::Unsupported` rather
//! than rejected, so one odd initializer never makes a whole file unreadable.

use super::{
    Cursor, NameResolver,
    lexer::{Token, TokenKind},
};
use crate::core::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Array(Vec<ArrayItem>),
    ClassConst { class: ClassRef, name: String },
    /// Global constant such as `PHP_EOL`.
    Constant(String),
    Concat(Box<Expr>, Box<Expr>),
    /// Description of a construct that cannot be evaluated statically.
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassRef {
    /// `self` or `static`
    Current,
    Parent,
    /// Fully-qualified name.
    Named(String),
}

/// Parse a standalone expression, e.g. the body of a data file after `return`.
pub fn parse_expression(tokens: &[Token], names: &NameResolver) -> Result<Expr, ParseError> {
    let mut cursor = Cursor::new(tokens);
    parse_expr(&mut cursor, names)
}

/// Parse one expression, stopping before the first `,`, `;`, `=>` or closing
/// bracket at nesting depth zero.
pub(crate) fn parse_expr(cursor: &mut Cursor<'_>, names: &NameResolver) -> Result<Expr, ParseError> {
    let mut expr = parse_operand(cursor, names)?;
    while cursor.eat_symbol(".") {
        let rhs = parse_operand(cursor, names)?;
        expr = Expr::Concat(Box::new(expr), Box::new(rhs));
    }
    if at_terminator(cursor) {
        return Ok(expr);
    }
    let description = match cursor.peek() {
        Some(TokenKind::Symbol("(")) => "function call".to_string(),
        Some(TokenKind::Symbol(op)) => format!("operator '{}'", op),
        _ => "expression".to_string(),
    };
    skip_to_terminator(cursor)?;
    Ok(Expr::Unsupported(description))
}

fn parse_operand(cursor: &mut Cursor<'_>, names: &NameResolver) -> Result<Expr, ParseError> {
    let Some(token) = cursor.peek() else {
        return Err(cursor.error("unexpected end of input in expression"));
    };
    match token {
        TokenKind::Str(s) => {
            cursor.bump();
            Ok(Expr::Str(s.clone()))
        }
        TokenKind::Interpolated => {
            cursor.bump();
            Ok(Expr::Unsupported("interpolated string".to_string()))
        }
        TokenKind::Int(i) => {
            cursor.bump();
            Ok(Expr::Int(*i))
        }
        TokenKind::Float(f) => {
            cursor.bump();
            Ok(Expr::Float(*f))
        }
        TokenKind::Symbol(sign @ ("-" | "+")) => {
            let negate = *sign == "-";
            match cursor.peek_nth(1) {
                Some(TokenKind::Int(i)) => {
                    let i = *i;
                    cursor.bump();
                    cursor.bump();
                    Ok(Expr::Int(if negate { i.wrapping_neg() } else { i }))
                }
                Some(TokenKind::Float(f)) => {
                    let f = *f;
                    cursor.bump();
                    cursor.bump();
                    Ok(Expr::Float(if negate { -f } else { f }))
                }
                _ => Ok(Expr::Unsupported(format!("unary '{}'", sign))),
            }
        }
        TokenKind::Symbol("(") => {
            cursor.bump();
            let inner = parse_expr(cursor, names)?;
            cursor.expect_symbol(")")?;
            Ok(inner)
        }
        TokenKind::Symbol("[") => {
            cursor.bump();
            parse_array_items(cursor, names, "]")
        }
        TokenKind::Name(name) => parse_name_operand(cursor, names, name),
        _ if at_terminator(cursor) => Err(cursor.error("expected expression")),
        // Left in place; parse_expr skips it and reports it unsupported.
        _ => Ok(Expr::Unsupported("expression".to_string())),
    }
}

fn parse_name_operand(
    cursor: &mut Cursor<'_>,
    names: &NameResolver,
    name: &str,
) -> Result<Expr, ParseError> {
    let lower = name.trim_start_matches('\\').to_ascii_lowercase();
    if !matches!(cursor.peek_nth(1), Some(TokenKind::Symbol("::"))) {
        match lower.as_str() {
            "true" => {
                cursor.bump();
                return Ok(Expr::Bool(true));
            }
            "false" => {
                cursor.bump();
                return Ok(Expr::Bool(false));
            }
            "null" => {
                cursor.bump();
                return Ok(Expr::Null);
            }
            "array" if matches!(cursor.peek_nth(1), Some(TokenKind::Symbol("("))) => {
                cursor.bump();
                cursor.bump();
                return parse_array_items(cursor, names, ")");
            }
            _ => {}
        }
        if matches!(cursor.peek_nth(1), Some(TokenKind::Symbol("("))) {
            // Call: name stays consumed, parse_expr skips the argument list.
            cursor.bump();
            return Ok(Expr::Unsupported(format!("call to {}()", name)));
        }
        cursor.bump();
        return Ok(Expr::Constant(name.trim_start_matches('\\').to_string()));
    }

    cursor.bump();
    cursor.bump();
    let class = match lower.as_str() {
        "self" | "static" => ClassRef::Current,
        "parent" => ClassRef::Parent,
        _ => ClassRef::Named(names.resolve(name)),
    };
    match cursor.peek() {
        Some(TokenKind::Name(constant)) => {
            cursor.bump();
            let constant = if constant.eq_ignore_ascii_case("class") {
                "class".to_string()
            } else {
                constant.clone()
            };
            if cursor.is_symbol("(") {
                return Ok(Expr::Unsupported(format!("static call {}::{}()", name, constant)));
            }
            Ok(Expr::ClassConst {
                class,
                name: constant,
            })
        }
        Some(TokenKind::Variable(property)) => {
            cursor.bump();
            Ok(Expr::Unsupported(format!("static property {}::${}", name, property)))
        }
        _ => Err(cursor.error("expected constant name after '::'")),
    }
}

fn parse_array_items(
    cursor: &mut Cursor<'_>,
    names: &NameResolver,
    close: &str,
) -> Result<Expr, ParseError> {
    let mut items = Vec::new();
    let mut unsupported: Option<String> = None;
    loop {
        if cursor.eat_symbol(close) {
            break;
        }
        if cursor.eat_symbol("...") {
            unsupported.get_or_insert_with(|| "array unpacking".to_string());
        }
        let first = parse_expr(cursor, names)?;
        let item = if cursor.eat_symbol("=>") {
            let value = parse_expr(cursor, names)?;
            ArrayItem {
                key: Some(first),
                value,
            }
        } else {
            ArrayItem {
                key: None,
                value: first,
            }
        };
        items.push(item);

        if cursor.eat_symbol(",") {
            continue;
        }
        cursor.expect_symbol(close)?;
        break;
    }
    Ok(match unsupported {
        Some(description) => Expr::Unsupported(description),
        None => Expr::Array(items),
    })
}

fn at_terminator(cursor: &Cursor<'_>) -> bool {
    matches!(
        cursor.peek(),
        None | Some(TokenKind::Symbol("," | ";" | ")" | "]" | "}" | "=>"))
    )
}

fn skip_to_terminator(cursor: &mut Cursor<'_>) -> Result<(), ParseError> {
    loop {
        match cursor.peek() {
            None => return Err(cursor.error("unexpected end of input in expression")),
            Some(TokenKind::Symbol("(" | "[" | "{") | TokenKind::AttributeStart) => {
                cursor.skip_balanced()?
            }
            Some(_) if at_terminator(cursor) => return Ok(()),
            Some(_) => {
                cursor.bump();
            }
        }
    }
}
