use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, DEFAULT_DESTINATION, EXPECTED_OUTPUT};

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--help").output()?;

    assert_eq!(output.status.code(), Some(0));
    let help = stdout(&output);
    assert!(help.contains("--messageTemplatesDirs"));
    assert!(help.contains("--destination"));
    assert!(help.contains("--previous"));
    assert!(help.contains("--dry-run"));

    Ok(())
}

#[test]
fn test_unknown_argument_exits_with_error() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("--overwrite").output()?;

    assert_eq!(output.status.code(), Some(2));

    Ok(())
}

#[test]
fn test_generate_from_default_directories() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(test.read_file(DEFAULT_DESTINATION)?, EXPECTED_OUTPUT);
    assert_eq!(
        stdout(&output),
        "✓ Wrote 9 messages from 4 classes to resources/Zend_Validate.php (0 translated, 2 duplicates suppressed)\n"
    );
    assert_eq!(stderr(&output), "");

    Ok(())
}

#[test]
fn test_generate_is_deterministic_and_overwrites() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(DEFAULT_DESTINATION, "stale content that is much longer than nothing")?;

    test.command().output()?;
    let first = test.read_file(DEFAULT_DESTINATION)?;
    test.command().output()?;
    let second = test.read_file(DEFAULT_DESTINATION)?;

    assert_eq!(first, EXPECTED_OUTPUT);
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_explicit_directories_and_destination() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test
        .command()
        .args([
            "-m",
            "library/Zend/Validator",
            "-d",
            "out/validator.php",
        ])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    let generated = test.read_file("out/validator.php")?;
    assert!(generated.contains("// Zend_Validator_Digits"));
    assert!(!generated.contains("Zend_I18n"));
    assert!(!test.root().join(DEFAULT_DESTINATION).exists());

    Ok(())
}

#[test]
fn test_library_from_environment() -> Result<()> {
    let test = CliTest::new()?;
    for (path, content) in crate::LIBRARY {
        test.write_file(&path.replacen("library/", "vendor/zf/", 1), content)?;
    }

    let output = test.command().env("LIB_PATH", "vendor/zf").output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(test.read_file(DEFAULT_DESTINATION)?, EXPECTED_OUTPUT);

    Ok(())
}

#[test]
fn test_missing_directory_is_fatal() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "library/Zend/Validator/Digits.php",
        crate::LIBRARY[1].1,
    )?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(
        stderr(&output),
        "Error: Message templates directory not found: library/Zend/I18n\n"
    );
    assert!(!test.root().join(DEFAULT_DESTINATION).exists());

    Ok(())
}

#[test]
fn test_duplicate_keys_across_classes() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/InArray.php",
        r#"<?php
class Zend_Validate_InArray
{
    const NOT_IN_ARRAY = 'notInArray';
    protected $_messageTemplates = array(
        self::NOT_IN_ARRAY => "'%value%' was not found in the haystack",
    );
}
"#,
    )?;
    test.write_file(
        "src/Explode.php",
        r#"<?php
class Zend_Validate_Explode
{
    protected $_messageTemplates = array(
        Zend_Validate_InArray::NOT_IN_ARRAY => 'Value was not found',
    );
}
"#,
    )?;

    let output = test
        .command()
        .args(["-m", "src", "--property", "_messageTemplates", "--dry-run"])
        .output()?;

    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        r#"<?php
return array(
    // Zend_Validate_Explode
    "notInArray" => "Value was not found",

    // Zend_Validate_InArray
    // "notInArray" - same message already appeared above.

);
"#
    );

    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test.command().arg("--dry-run").output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), EXPECTED_OUTPUT);
    assert!(stderr(&output).contains("dry run, resources/Zend_Validate.php not written"));
    assert!(!test.root().join(DEFAULT_DESTINATION).exists());

    Ok(())
}

#[test]
fn test_invalid_source_is_skipped_with_warning() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        "library/Zend/Validator/Broken.php",
        "<?php\nclass Broken {\n    protected $messageTemplates = array('x' => 'unterminated);\n",
    )?;
    test.write_file(
        "library/Zend/Validator/Computed.php",
        r#"<?php
namespace Zend\Validator;

class Computed
{
    protected $messageTemplates = array('computed' => sprintf('%s', 'x'));
}
"#,
    )?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file(DEFAULT_DESTINATION)?, EXPECTED_OUTPUT);
    let warnings = stderr(&output);
    assert!(warnings.contains("warning: Skipping library/Zend/Validator/Broken.php: line 3:"));
    assert!(warnings.contains(
        "warning: Cannot resolve default of $messageTemplates in Zend\\Validator\\Computed"
    ));

    Ok(())
}

#[test]
fn test_empty_template_table_keeps_header() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/Hidden.php",
        "<?php\nclass Zend_Validate_Hidden\n{\n    protected $messageTemplates = array();\n}\n",
    )?;

    let output = test.command().args(["-m", "src", "--dry-run"]).output()?;

    assert_eq!(
        stdout(&output),
        "<?php\nreturn array(\n    // Zend_Validate_Hidden\n\n);\n"
    );

    Ok(())
}

#[test]
fn test_verbose_lists_template_classes() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test.command().arg("-v").output()?;

    let out = stdout(&output);
    assert!(out.starts_with(
        "Scanned 5 files in library/Zend/I18n, library/Zend/Validator, found 5 classes\n"
    ));
    assert!(out.contains(
        "  Zend_Validator_Digits 3 templates (library/Zend/Validator/Digits.php)\n"
    ));

    Ok(())
}
