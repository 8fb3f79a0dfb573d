//! Static evaluation of constant expressions.
//!
//! Replaces reflection: property defaults and class constants are computed
//! from the parsed source, following `self::`/`parent::`/`Name::` references
//! through the scanned classes, their traits, parent chains and interfaces.

use std::collections::HashMap;

use thiserror::Error;

use super::{
    data::{ClassDescriptor, ConstantDescriptor},
    parsers::expr::{ArrayItem, ClassRef, Expr},
};

/// Guards against constants that refer to each other in a cycle.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Array(Vec<(ArrayKey, Value)>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    Str(String),
}

impl ArrayKey {
    pub fn into_string(self) -> String {
        match self {
            ArrayKey::Int(i) => i.to_string(),
            ArrayKey::Str(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("undefined constant {0}")]
    UndefinedConstant(String),
    #[error("unknown class {0}")]
    UnknownClass(String),
    #[error("{0} has no parent class")]
    NoParent(String),
    #[error("'{0}' used outside of a class")]
    NoClassScope(String),
    #[error("unsupported {0}")]
    Unsupported(String),
    #[error("cannot convert array to string")]
    ArrayToString,
    #[error("illegal array key")]
    IllegalKey,
    #[error("constant expressions nested too deeply (cycle?)")]
    TooDeep,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Array(_) => "array",
        }
    }

    /// String conversion as PHP's `.` operator performs it.
    pub fn to_php_string(&self) -> Result<String, EvalError> {
        Ok(match self {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_to_php_string(*f),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) | Value::Null => String::new(),
            Value::Array(_) => return Err(EvalError::ArrayToString),
        })
    }

    /// Array key coercion: numeric strings become integers, bools and floats
    /// are truncated to integers, null becomes the empty string.
    fn into_key(self) -> Result<ArrayKey, EvalError> {
        Ok(match self {
            Value::Str(s) => match canonical_int(&s) {
                Some(i) => ArrayKey::Int(i),
                None => ArrayKey::Str(s),
            },
            Value::Int(i) => ArrayKey::Int(i),
            Value::Float(f) => ArrayKey::Int(f as i64),
            Value::Bool(b) => ArrayKey::Int(i64::from(b)),
            Value::Null => ArrayKey::Str(String::new()),
            Value::Array(_) => return Err(EvalError::IllegalKey),
        })
    }
}

/// Decimal integer strings without leading zeros or `+` sign.
fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if (digits.len() > 1 && digits.starts_with('0')) || s == "-0" {
        return None;
    }
    s.parse().ok()
}

/// Scanned classes by lowercased fully-qualified name.
#[derive(Debug, Default)]
pub struct ClassIndex<'a> {
    classes: HashMap<String, &'a ClassDescriptor>,
}

impl<'a> ClassIndex<'a> {
    pub fn new(classes: &'a [ClassDescriptor]) -> Self {
        let mut index = Self::default();
        for class in classes {
            index.insert(class);
        }
        index
    }

    pub fn insert(&mut self, class: &'a ClassDescriptor) {
        self.classes.insert(class.name.to_ascii_lowercase(), class);
    }

    /// Class names are case-insensitive in PHP.
    pub fn get(&self, name: &str) -> Option<&'a ClassDescriptor> {
        self.classes
            .get(&name.trim_start_matches('\\').to_ascii_lowercase())
            .copied()
    }
}

pub struct Evaluator<'a> {
    index: &'a ClassIndex<'a>,
}

impl<'a> Evaluator<'a> {
    pub fn new(index: &'a ClassIndex<'a>) -> Self {
        Self { index }
    }

    /// Evaluate `expr` as written inside `scope` (the class it appears in,
    /// `None` for free-standing data files).
    pub fn evaluate(
        &self,
        expr: &Expr,
        scope: Option<&ClassDescriptor>,
    ) -> Result<Value, EvalError> {
        self.eval(expr, scope, 0)
    }

    fn eval(
        &self,
        expr: &Expr,
        scope: Option<&ClassDescriptor>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        if depth > MAX_DEPTH {
            return Err(EvalError::TooDeep);
        }
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Int(i) => Ok(Value::Int(*i)),
            Expr::Float(f) => Ok(Value::Float(*f)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Array(items) => self.eval_array(items, scope, depth),
            Expr::Concat(lhs, rhs) => {
                let mut text = self.eval(lhs, scope, depth + 1)?.to_php_string()?;
                text.push_str(&self.eval(rhs, scope, depth + 1)?.to_php_string()?);
                Ok(Value::Str(text))
            }
            Expr::Constant(name) => global_constant(name),
            Expr::ClassConst { class, name } => self.eval_class_constant(class, name, scope, depth),
            Expr::Unsupported(description) => Err(EvalError::Unsupported(description.clone())),
        }
    }

    fn eval_array(
        &self,
        items: &[ArrayItem],
        scope: Option<&ClassDescriptor>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        let mut entries: Vec<(ArrayKey, Value)> = Vec::with_capacity(items.len());
        let mut next_index: i64 = 0;
        for item in items {
            let key = match &item.key {
                Some(key) => self.eval(key, scope, depth + 1)?.into_key()?,
                None => ArrayKey::Int(next_index),
            };
            if let ArrayKey::Int(i) = key {
                if i >= next_index {
                    next_index = i.saturating_add(1);
                }
            }
            let value = self.eval(&item.value, scope, depth + 1)?;
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => entries.push((key, value)),
            }
        }
        Ok(Value::Array(entries))
    }

    fn eval_class_constant(
        &self,
        class: &ClassRef,
        name: &str,
        scope: Option<&ClassDescriptor>,
        depth: usize,
    ) -> Result<Value, EvalError> {
        let target_name = match class {
            ClassRef::Current => match scope {
                Some(current) => current.name.clone(),
                None => return Err(EvalError::NoClassScope(format!("self::{}", name))),
            },
            ClassRef::Parent => {
                let current = scope.ok_or_else(|| {
                    EvalError::NoClassScope(format!("parent::{}", name))
                })?;
                current
                    .parent
                    .clone()
                    .ok_or_else(|| EvalError::NoParent(current.name.clone()))?
            }
            ClassRef::Named(named) => named.clone(),
        };

        // `Foo::class` needs only the name, not the class itself.
        if name == "class" {
            return Ok(Value::Str(target_name));
        }

        let target = self
            .index
            .get(&target_name)
            .ok_or_else(|| EvalError::UnknownClass(target_name.clone()))?;
        match self.find_constant(target, name, 0) {
            Some((owner, constant)) => self.eval(&constant.value, Some(owner), depth + 1),
            None => Err(EvalError::UndefinedConstant(format!(
                "{}::{}",
                target_name, name
            ))),
        }
    }

    /// Look `name` up on `class`, then its traits, its parent chain and its
    /// interfaces. Returns the declaring class with the constant.
    fn find_constant(
        &self,
        class: &'a ClassDescriptor,
        name: &str,
        hops: usize,
    ) -> Option<(&'a ClassDescriptor, &'a ConstantDescriptor)> {
        if hops > MAX_DEPTH {
            return None;
        }
        if let Some(constant) = class.constant(name) {
            return Some((class, constant));
        }
        class
            .traits
            .iter()
            .chain(&class.parent)
            .chain(&class.interfaces)
            .filter_map(|next| self.index.get(next))
            .find_map(|next| self.find_constant(next, name, hops + 1))
    }
}

fn global_constant(name: &str) -> Result<Value, EvalError> {
    match name {
        "PHP_EOL" => Ok(Value::Str("\n".to_string())),
        "PHP_INT_MAX" => Ok(Value::Int(i64::MAX)),
        "PHP_INT_MIN" => Ok(Value::Int(i64::MIN)),
        "PHP_INT_SIZE" => Ok(Value::Int(8)),
        _ => Err(EvalError::UndefinedConstant(name.to_string())),
    }
}

/// PHP's float-to-string conversion: 14 significant digits, trailing zeros
/// dropped, and exponent notation (`1.0E+25`, `1.5E-7`) outside `1e-4..1e14`.
fn float_to_php_string(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sign = if f < 0.0 { "-" } else { "" };
    let formatted = format!("{:.13e}", f.abs());
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');

    if !(-4..14).contains(&exponent) {
        let (first, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{first}.{rest}E{exp_sign}{}", exponent.abs());
    }

    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }
    let int_len = exponent as usize + 1;
    if digits.len() <= int_len {
        format!("{sign}{digits}{}", "0".repeat(int_len - digits.len()))
    } else {
        let (int_part, frac) = digits.split_at(int_len);
        format!("{sign}{int_part}.{frac}")
    }
}
