//! Renders a merge result as a PHP data file (a single `return array(...)`)
//! and writes it out.

use std::{fmt::Write as _, fs, path::Path};

use anyhow::{Context, Result};

use super::merge::{MergeResult, MergedEntry};

const INDENT: &str = "    ";

/// Render the whole file into memory.
pub fn render(result: &MergeResult) -> String {
    let mut out = String::from("<?php\nreturn array(\n");
    for group in &result.groups {
        let _ = writeln!(out, "{INDENT}// {}", group.class);
        for entry in &group.entries {
            match entry {
                MergedEntry::Message { key, text, .. } => {
                    let _ = writeln!(out, "{INDENT}\"{}\" => \"{}\",", escape(key), escape(text));
                }
                MergedEntry::Duplicate { key } => {
                    let _ = writeln!(
                        out,
                        "{INDENT}// \"{}\" - same message already appeared above.",
                        escape(key)
                    );
                }
            }
        }
        out.push('\n');
    }
    out.push_str(");\n");
    out
}

/// Escape text for a double-quoted literal. Only `\` and `"` are touched.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Write the rendered buffer in one operation, replacing any existing file.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::merge::ClassGroup;

    fn sample() -> MergeResult {
        MergeResult {
            groups: vec![
                ClassGroup {
                    class: "Zend_Validator_Explode".to_string(),
                    entries: vec![MergedEntry::Message {
                        key: "notInArray".to_string(),
                        text: "The input was not found in the haystack".to_string(),
                        translated: false,
                    }],
                },
                ClassGroup {
                    class: "Zend_Validator_Hidden".to_string(),
                    entries: vec![],
                },
                ClassGroup {
                    class: "Zend_Validator_InArray".to_string(),
                    entries: vec![
                        MergedEntry::Duplicate {
                            key: "notInArray".to_string(),
                        },
                        MergedEntry::Message {
                            key: "quoted".to_string(),
                            text: r#"Say "%value%" \ done"#.to_string(),
                            translated: true,
                        },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_render_layout() {
        assert_snapshot!(render(&sample()), @r#"
<?php
return array(
    // Zend_Validator_Explode
    "notInArray" => "The input was not found in the haystack",

    // Zend_Validator_Hidden

    // Zend_Validator_InArray
    // "notInArray" - same message already appeared above.
    "quoted" => "Say \"%value%\" \\ done",

);
"#);
    }

    #[test]
    fn test_render_empty_result() {
        assert_eq!(render(&MergeResult::default()), "<?php\nreturn array(\n);\n");
    }

    #[test]
    fn test_escape_only_quotes_and_backslashes() {
        assert_eq!(escape(r#"a "b" \c"#), r#"a \"b\" \\c"#);
        assert_eq!(escape("$value and\nnewline"), "$value and\nnewline");
        assert_eq!(escape("値が必要です"), "値が必要です");
    }

    #[test]
    fn test_write_output_creates_parent_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resources").join("Zend_Validate.php");

        write_output(&path, "first").unwrap();
        write_output(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
