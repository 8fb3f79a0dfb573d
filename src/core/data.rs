//! Data model shared by the scanner, extractor, merge engine and renderer.

use std::{
    collections::{BTreeMap, HashMap, btree_map},
    path::PathBuf,
};

use super::parsers::expr::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
}

/// A class, interface or trait discovered by the structural parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    pub kind: ClassKind,
    /// Fully-qualified name with `\` separators and no leading backslash.
    pub name: String,
    pub file_path: PathBuf,
    /// Fully-qualified name of the `extends` target of a class, if any.
    pub parent: Option<String>,
    /// Implemented interfaces of a class, or extended interfaces of an interface.
    pub interfaces: Vec<String>,
    /// Traits pulled in with `use` inside the body.
    pub traits: Vec<String>,
    pub constants: Vec<ConstantDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
}

impl ClassDescriptor {
    /// Identity used as the TranslationSet key: namespace separators become `_`.
    pub fn identity(&self) -> String {
        class_identity(&self.name)
    }

    /// Properties are case-sensitive in PHP.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&ConstantDescriptor> {
        self.constants.iter().find(|c| c.name == name)
    }
}

pub fn class_identity(name: &str) -> String {
    name.trim_start_matches('\\').replace('\\', "_")
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub is_static: bool,
    /// Initializer as written; `None` when declared without one.
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDescriptor {
    pub name: String,
    pub value: Expr,
}

/// Ordered message-key to message-text table of one class.
///
/// Keys are unique; re-inserting a key replaces its text but keeps its
/// original position, the way PHP array literals behave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateMap {
    entries: Vec<(String, String)>,
}

impl TemplateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((key, text)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TemplateMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Class identity to TemplateMap, always iterated in sorted identity order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSet {
    classes: BTreeMap<String, TemplateMap>,
}

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class table. Returns the table it replaced, if the identity
    /// was already present.
    pub fn insert(&mut self, identity: impl Into<String>, map: TemplateMap) -> Option<TemplateMap> {
        self.classes.insert(identity.into(), map)
    }

    pub fn get(&self, identity: &str) -> Option<&TemplateMap> {
        self.classes.get(identity)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TemplateMap> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Overlay from original message text to a previously chosen translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousTranslations {
    texts: HashMap<String, String>,
}

impl PreviousTranslations {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.texts.get(original).map(String::as_str)
    }

    pub fn insert(&mut self, original: impl Into<String>, translated: impl Into<String>) {
        self.texts.insert(original.into(), translated.into());
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PreviousTranslations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut previous = PreviousTranslations::empty();
        for (k, v) in iter {
            previous.insert(k, v);
        }
        previous
    }
}
