//! Template extraction: finds the message-template property on a class and
//! turns its statically evaluated default into a `TemplateMap`.

use super::{
    data::{ClassDescriptor, ClassKind, TemplateMap},
    eval::{ClassIndex, Evaluator, Value},
};

/// Property name used by Zend validators.
pub const DEFAULT_TEMPLATE_PROPERTY: &str = "messageTemplates";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(TemplateMap),
    /// The class does not declare the property.
    NoProperty,
    /// The default evaluated, but is not a table of strings.
    NotAMapping(String),
    /// The default cannot be determined statically.
    Unresolved(String),
}

impl Extraction {
    pub fn into_template_map(self) -> Option<TemplateMap> {
        match self {
            Extraction::Found(map) => Some(map),
            _ => None,
        }
    }
}

pub struct TemplateExtractor<'a> {
    evaluator: Evaluator<'a>,
    property: &'a str,
}

impl<'a> TemplateExtractor<'a> {
    pub fn new(index: &'a ClassIndex<'a>, property: &'a str) -> Self {
        Self {
            evaluator: Evaluator::new(index),
            property,
        }
    }

    /// Only properties declared on the class itself count; inherited ones
    /// are reported with the class that declares them. Interfaces and traits
    /// never contribute a table of their own.
    pub fn extract(&self, class: &ClassDescriptor) -> Extraction {
        if class.kind != ClassKind::Class {
            return Extraction::NoProperty;
        }
        let Some(property) = class.property(self.property) else {
            return Extraction::NoProperty;
        };
        let Some(default) = &property.default else {
            return Extraction::NotAMapping("declared without a default value".to_string());
        };
        match self.evaluator.evaluate(default, Some(class)) {
            Ok(value) => match into_template_map(value) {
                Ok(map) => Extraction::Found(map),
                Err(reason) => Extraction::NotAMapping(reason),
            },
            Err(err) => Extraction::Unresolved(err.to_string()),
        }
    }
}

fn into_template_map(value: Value) -> Result<TemplateMap, String> {
    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(format!("found {} instead of an array", other.type_name())),
    };
    let mut map = TemplateMap::new();
    for (key, text) in entries {
        let key = key.into_string();
        match text {
            Value::Str(text) => map.insert(key, text),
            other => {
                return Err(format!(
                    "message \"{}\" is {} instead of a string",
                    key,
                    other.type_name()
                ));
            }
        }
    }
    Ok(map)
}
