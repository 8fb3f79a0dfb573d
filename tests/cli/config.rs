use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, EXPECTED_OUTPUT};

#[test]
fn test_config_file_sets_paths() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        ".msgresrc.json",
        r#"{
    "messageTemplatesDirs": ["library/Zend/Validator"],
    "destination": "lang/en/validate.php"
}"#,
    )?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    let generated = test.read_file("lang/en/validate.php")?;
    assert!(generated.starts_with("<?php\nreturn array(\n    // Zend_Validator_Digits\n"));
    assert!(!generated.contains("Zend_I18n"));

    Ok(())
}

#[test]
fn test_flags_override_config_file() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        ".msgresrc.json",
        r#"{ "messageTemplatesDirs": ["library/Zend/Validator"], "destination": "lang/en/validate.php" }"#,
    )?;

    let output = test
        .command()
        .args(["-m", "library/Zend/I18n,library/Zend/Validator", "-d", "out.php"])
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(test.read_file("out.php")?, EXPECTED_OUTPUT);
    assert!(!test.root().join("lang").exists());

    Ok(())
}

#[test]
fn test_config_found_from_subdirectory() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(
        ".msgresrc.json",
        r#"{ "ignores": ["**/I18n/**"], "messageTemplatesDirs": ["../library/Zend/I18n"] }"#,
    )?;
    test.write_file("tools/.keep", "")?;

    let output = test
        .command()
        .current_dir(test.root().join("tools"))
        .arg("--dry-run")
        .output()?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<?php\nreturn array(\n);\n"
    );

    Ok(())
}

#[test]
fn test_invalid_config_is_fatal() -> Result<()> {
    let test = CliTest::with_library()?;
    test.write_file(".msgresrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("Invalid glob pattern in 'ignores': \"[invalid\"")
    );

    Ok(())
}
