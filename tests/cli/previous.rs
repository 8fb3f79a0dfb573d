use anyhow::Result;
use msgres::core::previous::parse_table;
use pretty_assertions::assert_eq;

use crate::{CliTest, DEFAULT_DESTINATION, EXPECTED_OUTPUT};

#[test]
fn test_previous_translations_are_kept() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        "resources/ja/Zend_Validate.php",
        r#"<?php
/**
 * Japanese translations for Zend_Validate
 */
return array(
    "The input is an empty string" => "空の文字列です",
    "Value is required and can't be empty" => '値は必須です',
    "No longer used" => "使われていません",
);
"#,
    )?;

    let output = test
        .command()
        .args([
            "-p",
            "resources/ja/Zend_Validate.php",
            "-d",
            "resources/ja/Zend_Validate.new.php",
        ])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    let generated = test.read_file("resources/ja/Zend_Validate.new.php")?;
    assert!(generated.contains("    \"alnumStringEmpty\" => \"空の文字列です\",\n"));
    assert!(generated.contains("    \"digitsStringEmpty\" => \"空の文字列です\",\n"));
    assert!(generated.contains("    \"isEmpty\" => \"値は必須です\",\n"));
    assert!(generated.contains(
        "    \"notDigits\" => \"The input must contain only digits\",\n"
    ));
    assert!(!generated.contains("使われていません"));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "✓ Wrote 9 messages from 4 classes to resources/ja/Zend_Validate.new.php (3 translated, 2 duplicates suppressed)\n"
    );

    Ok(())
}

#[test]
fn test_previous_translations_from_json() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        "ja.json",
        r#"{ "Invalid type given. String expected": "不正な型です" }"#,
    )?;

    let output = test.command().args(["-p", "ja.json", "--dry-run"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    // The only class with that text lost its key to an earlier class.
    assert_eq!(String::from_utf8_lossy(&output.stdout), EXPECTED_OUTPUT);

    Ok(())
}

#[test]
fn test_missing_previous_file_is_tolerated() -> Result<()> {
    let test = CliTest::with_library()?;

    let output = test.command().args(["-p", "missing.php"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file(DEFAULT_DESTINATION)?, EXPECTED_OUTPUT);
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "warning: Previous translations file not found: missing.php (continuing without it)\n"
    );

    Ok(())
}

#[test]
fn test_invalid_previous_file_is_fatal() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file("broken.php", "<?php\nreturn array(\n  'a' => include 'b.php',\n);\n")?;

    let output = test.command().args(["-p", "broken.php"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .starts_with("Error: Failed to load previous translations from broken.php:")
    );
    assert!(!test.root().join(DEFAULT_DESTINATION).exists());

    Ok(())
}

#[test]
fn test_output_loads_back_as_the_merged_table() -> Result<()> {
    let test = CliTest::with_library()?;

    test.command().output()?;
    let pairs = parse_table(&test.read_file(DEFAULT_DESTINATION)?)?;

    let keys: Vec<_> = pairs.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "alnumInvalid",
            "notAlnum",
            "alnumStringEmpty",
            "notAlpha",
            "notDigits",
            "digitsStringEmpty",
            "digitsInvalid",
            "isEmpty",
            "notEmptyInvalid",
        ]
    );
    assert_eq!(
        pairs[7],
        (
            "isEmpty".to_string(),
            "Value is required and can't be empty".to_string()
        )
    );

    Ok(())
}

#[test]
fn test_regenerating_from_own_output_is_stable() -> Result<()> {
    let test = CliTest::with_library()?;

    test.command().output()?;
    let output = test
        .command()
        .args(["-p", DEFAULT_DESTINATION])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file(DEFAULT_DESTINATION)?, EXPECTED_OUTPUT);

    Ok(())
}

#[test]
fn test_placeholder_text_survives_regeneration() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        "src/LessThan.php",
        r#"<?php
class Zend_Validate_LessThan
{
    protected $messageTemplates = array(
        'tooHigh' => 'Price exceeds $max',
    );
}
"#,
    )?;
    test.write_file(
        "ja.php",
        "<?php\nreturn array(\n    \"Price exceeds $max\" => \"価格が $max を超えています\",\n);\n",
    )?;

    let first = test.command().args(["-m", "src", "-d", "out.php"]).output()?;
    assert_eq!(first.status.code(), Some(0));
    let generated = test.read_file("out.php")?;
    assert!(generated.contains("    \"tooHigh\" => \"Price exceeds $max\",\n"));

    let again = test
        .command()
        .args(["-m", "src", "-d", "out.php", "-p", "out.php"])
        .output()?;
    assert_eq!(again.status.code(), Some(0));
    assert_eq!(test.read_file("out.php")?, generated);

    let translated = test
        .command()
        .args(["-m", "src", "-p", "ja.php", "--dry-run"])
        .output()?;
    assert_eq!(translated.status.code(), Some(0));
    assert!(
        String::from_utf8_lossy(&translated.stdout)
            .contains("    \"tooHigh\" => \"価格が $max を超えています\",\n")
    );

    Ok(())
}
