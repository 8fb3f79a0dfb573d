//! Error and warning types for the generation pipeline.
//!
//! Fatal conditions are `GenerateError`s and abort the run. Everything that
//! only affects a single file or class is a `SourceWarning`: it is recorded,
//! reported, and scanning continues.

use std::{io, path::PathBuf};

use thiserror::Error;

/// A lexer or structural parser failure, located by 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Message templates directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Failed to load previous translations from {}: {reason}", .path.display())]
    InvalidPrevious { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum SourceWarning {
    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Skipping {}: {error}", .path.display())]
    Invalid { path: PathBuf, error: ParseError },

    #[error("Cannot resolve default of ${property} in {class}: {reason}")]
    UnresolvedDefault {
        class: String,
        property: String,
        reason: String,
    },

    #[error("Default of ${property} in {class} is not a table of strings: {reason}")]
    NotAMapping {
        class: String,
        property: String,
        reason: String,
    },

    #[error("Class {identity} is declared more than once; using {}", .path.display())]
    DuplicateClass { identity: String, path: PathBuf },

    #[error("Previous translations file not found: {} (continuing without it)", .0.display())]
    PreviousMissing(PathBuf),
}
