//! Loading the previous-translation overlay.
//!
//! The file is read as data, never executed: PHP files are tokenized and the
//! array literal after `return` is evaluated statically; `.json` files are
//! plain objects of strings.

use std::{fs, path::Path};

use anyhow::{Result, bail};
use serde_json::Value as JsonValue;

use super::{
    data::PreviousTranslations,
    error::GenerateError,
    eval::{ClassIndex, Evaluator, Value},
    parsers::{
        NameResolver,
        expr::parse_expression,
        lexer::{TokenKind, tokenize_data},
    },
};

/// Load the overlay from `path`. A missing file is the caller's concern; any
/// read or parse failure here is fatal.
pub fn load_previous(path: &Path) -> Result<PreviousTranslations> {
    let invalid = |reason: String| GenerateError::InvalidPrevious {
        path: path.to_path_buf(),
        reason,
    };
    let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let parsed = if has_extension(path, "json") {
        parse_json_table(&content)
    } else {
        parse_table(&content)
    };
    let pairs = parsed.map_err(|e| invalid(format!("{:#}", e)))?;

    Ok(pairs.into_iter().collect())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Read the string pairs of a PHP data file of the form `return array(...);`.
///
/// String entries of nested arrays are included as well, so files grouped
/// by section still work as an overlay. Non-string values are ignored.
pub fn parse_table(source: &str) -> Result<Vec<(String, String)>> {
    let tokens = tokenize_data(source)?;
    let Some(start) = tokens
        .iter()
        .position(|t| matches!(&t.kind, TokenKind::Name(n) if n.eq_ignore_ascii_case("return")))
    else {
        bail!("no 'return' statement found");
    };
    let expr = parse_expression(&tokens[start + 1..], &NameResolver::default())?;

    let index = ClassIndex::default();
    let value = Evaluator::new(&index).evaluate(&expr, None)?;
    let Value::Array(entries) = value else {
        bail!("returned value is not an array");
    };

    let mut pairs = Vec::with_capacity(entries.len());
    for (key, value) in entries {
        match value {
            Value::Str(text) => pairs.push((key.into_string(), text)),
            Value::Array(nested) => {
                for (nested_key, nested_value) in nested {
                    if let Value::Str(text) = nested_value {
                        pairs.push((nested_key.into_string(), text));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(pairs)
}

fn parse_json_table(source: &str) -> Result<Vec<(String, String)>> {
    let json: JsonValue = serde_json::from_str(source)?;
    let JsonValue::Object(map) = json else {
        bail!("root of JSON file must be an object");
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            JsonValue::String(text) => Some((key, text)),
            _ => None,
        })
        .collect())
}
