//! Merge engine: folds the per-class template tables into one ordered
//! table, suppressing keys already emitted by an earlier class and applying
//! the previous-translation overlay.

use std::collections::HashSet;

use super::data::{PreviousTranslations, TranslationSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedEntry {
    Message {
        key: String,
        text: String,
        /// True when `text` came from the previous translations.
        translated: bool,
    },
    /// The key was already emitted by an earlier class.
    Duplicate { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassGroup {
    pub class: String,
    pub entries: Vec<MergedEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub groups: Vec<ClassGroup>,
}

impl MergeResult {
    /// The flat key to text table, duplicates excluded.
    pub fn table(&self) -> Vec<(&str, &str)> {
        self.messages().map(|(key, text, _)| (key, text)).collect()
    }

    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    pub fn translated_count(&self) -> usize {
        self.messages().filter(|(_, _, translated)| *translated).count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.entries)
            .filter(|e| matches!(e, MergedEntry::Duplicate { .. }))
            .count()
    }

    fn messages(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.groups
            .iter()
            .flat_map(|g| &g.entries)
            .filter_map(|e| match e {
                MergedEntry::Message {
                    key,
                    text,
                    translated,
                } => Some((key.as_str(), text.as_str(), *translated)),
                MergedEntry::Duplicate { .. } => None,
            })
    }
}

/// Merge every class table in identity order.
///
/// The first class (in sorted order) to declare a key owns it; later
/// declarations become `Duplicate` markers, whatever their text. Text is
/// replaced by the previous translation of the original text when one
/// exists and kept as-is otherwise.
pub fn merge(set: &TranslationSet, previous: &PreviousTranslations) -> MergeResult {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut groups = Vec::with_capacity(set.len());

    for (class, templates) in set.iter() {
        let mut entries = Vec::with_capacity(templates.len());
        for (key, original) in templates.iter() {
            if !seen.insert(key) {
                entries.push(MergedEntry::Duplicate {
                    key: key.to_string(),
                });
                continue;
            }
            let entry = match previous.get(original) {
                Some(translation) => MergedEntry::Message {
                    key: key.to_string(),
                    text: translation.to_string(),
                    translated: true,
                },
                None => MergedEntry::Message {
                    key: key.to_string(),
                    text: original.to_string(),
                    translated: false,
                },
            };
            entries.push(entry);
        }
        groups.push(ClassGroup {
            class: class.clone(),
            entries,
        });
    }

    MergeResult { groups }
}
