//! Generation pipeline: scan → extract → merge → render → write.
//!
//! ## Modules
//!
//! - `file_scanner`: walks the template directories
//! - `parsers`: static PHP analysis (lexer, expressions, class structure)
//! - `eval`: constant-expression evaluation over the scanned classes
//! - `extract`: finds and evaluates the message-template property
//! - `merge`: duplicate suppression and translation overlay
//! - `render`: PHP data file output
//! - `previous`: loads the previous-translation overlay

pub mod data;
pub mod error;
pub mod eval;
pub mod extract;
pub mod file_scanner;
pub mod merge;
pub mod parsers;
pub mod previous;
pub mod render;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;

use data::{ClassDescriptor, ClassKind, PreviousTranslations, TranslationSet};
use error::SourceWarning;
use eval::ClassIndex;
use extract::{Extraction, TemplateExtractor};
use merge::MergeResult;

/// Fully resolved inputs of one run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub template_dirs: Vec<PathBuf>,
    pub destination: PathBuf,
    pub previous: Option<PathBuf>,
    pub property: String,
    pub extensions: Vec<String>,
    pub ignores: Vec<String>,
    /// Render only; leave the destination untouched.
    pub dry_run: bool,
}

/// A class that contributed a template table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateClass {
    pub identity: String,
    pub file_path: PathBuf,
    pub message_count: usize,
}

#[derive(Debug)]
pub struct GenerateResult {
    pub files_scanned: usize,
    /// Classes only; interfaces and traits are indexed but not counted.
    pub classes_found: usize,
    /// In identity order.
    pub template_classes: Vec<TemplateClass>,
    pub merge: MergeResult,
    pub output: String,
    pub destination: PathBuf,
    pub written: bool,
    pub warnings: Vec<SourceWarning>,
}

pub fn generate(options: &GenerateOptions) -> Result<GenerateResult> {
    let ignores = compile_patterns(&options.ignores)?;
    let scan = file_scanner::scan_files(&options.template_dirs, &options.extensions, &ignores)?;
    let mut warnings = scan.warnings;

    let mut classes = Vec::new();
    for path in &scan.files {
        match parse_file(path) {
            Ok(found) => classes.extend(found),
            Err(warning) => warnings.push(warning),
        }
    }

    let (set, template_classes) = extract_templates(&classes, &options.property, &mut warnings);

    let previous = match &options.previous {
        Some(path) if path.exists() => previous::load_previous(path)?,
        Some(path) => {
            warnings.push(SourceWarning::PreviousMissing(path.clone()));
            PreviousTranslations::empty()
        }
        None => PreviousTranslations::empty(),
    };

    let merged = merge::merge(&set, &previous);
    let output = render::render(&merged);
    if !options.dry_run {
        render::write_output(&options.destination, &output)?;
    }

    Ok(GenerateResult {
        files_scanned: scan.files.len(),
        classes_found: classes.iter().filter(|c| c.kind == ClassKind::Class).count(),
        template_classes,
        merge: merged,
        output,
        destination: options.destination.clone(),
        written: !options.dry_run,
        warnings,
    })
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern: \"{}\"", p)))
        .collect()
}

fn parse_file(path: &Path) -> Result<Vec<ClassDescriptor>, SourceWarning> {
    let bytes = fs::read(path).map_err(|source| SourceWarning::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let source = String::from_utf8_lossy(&bytes);
    parsers::classes::parse_classes(&source, path).map_err(|error| SourceWarning::Invalid {
        path: path.to_path_buf(),
        error,
    })
}

/// Build the TranslationSet from every class declaring the template property.
fn extract_templates(
    classes: &[ClassDescriptor],
    property: &str,
    warnings: &mut Vec<SourceWarning>,
) -> (TranslationSet, Vec<TemplateClass>) {
    let index = ClassIndex::new(classes);
    let extractor = TemplateExtractor::new(&index, property);
    let mut set = TranslationSet::new();
    let mut template_classes: Vec<TemplateClass> = Vec::new();

    for class in classes {
        match extractor.extract(class) {
            Extraction::Found(map) => {
                let identity = class.identity();
                let entry = TemplateClass {
                    identity: identity.clone(),
                    file_path: class.file_path.clone(),
                    message_count: map.len(),
                };
                if set.insert(identity.clone(), map).is_some() {
                    warnings.push(SourceWarning::DuplicateClass {
                        identity: identity.clone(),
                        path: class.file_path.clone(),
                    });
                    template_classes.retain(|c| c.identity != identity);
                }
                template_classes.push(entry);
            }
            Extraction::NoProperty => {}
            Extraction::NotAMapping(reason) => warnings.push(SourceWarning::NotAMapping {
                class: class.name.clone(),
                property: property.to_string(),
                reason,
            }),
            Extraction::Unresolved(reason) => warnings.push(SourceWarning::UnresolvedDefault {
                class: class.name.clone(),
                property: property.to_string(),
                reason,
            }),
        }
    }

    template_classes.sort_by(|a, b| a.identity.cmp(&b.identity));
    (set, template_classes)
}
