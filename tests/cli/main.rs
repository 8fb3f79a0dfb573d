use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use tempfile::TempDir;

mod config;
mod generate;
mod previous;

const BIN_NAME: &str = "msgres";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        // Keeps config discovery inside the project.
        fs::create_dir(project_dir.join(".git"))?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    /// A project with a small validator library under `library/Zend`.
    pub fn with_library() -> Result<Self> {
        let test = Self::new()?;
        for (path, content) in LIBRARY {
            test.write_file(path, content)?;
        }
        Ok(test)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

pub const LIBRARY: &[(&str, &str)] = &[
    (
        "library/Zend/Validator/AbstractValidator.php",
        r#"<?php
namespace Zend\Validator;

abstract class AbstractValidator implements ValidatorInterface
{
    protected $abstractOptions = array(
        'messages'        => array(),
        'valueObscured'   => false,
        'messageLength'   => -1,
    );

    public function getMessages()
    {
        return array_unique($this->abstractOptions['messages']);
    }
}
"#,
    ),
    (
        "library/Zend/Validator/Digits.php",
        r#"<?php
namespace Zend\Validator;

class Digits extends AbstractValidator
{
    const NOT_DIGITS   = 'notDigits';
    const STRING_EMPTY = 'digitsStringEmpty';
    const INVALID      = 'digitsInvalid';

    /**
     * Validation failure message template definitions
     *
     * @var array
     */
    protected $messageTemplates = array(
        self::NOT_DIGITS   => "The input must contain only digits",
        self::STRING_EMPTY => "The input is an empty string",
        self::INVALID      => "Invalid type given. String, integer or float expected",
    );
}
"#,
    ),
    (
        "library/Zend/Validator/NotEmpty.php",
        r#"<?php
namespace Zend\Validator;

class NotEmpty extends AbstractValidator
{
    const IS_EMPTY = 'isEmpty';
    const INVALID  = 'notEmptyInvalid';

    protected $messageTemplates = array(
        self::IS_EMPTY => "Value is required and can't be empty",
        self::INVALID  => "Invalid type given. String, integer, float, boolean or array expected",
    );
}
"#,
    ),
    (
        "library/Zend/I18n/Validator/Alnum.php",
        r#"<?php
namespace Zend\I18n\Validator;

use Zend\Validator\AbstractValidator;

class Alnum extends AbstractValidator
{
    const INVALID      = 'alnumInvalid';
    const NOT_ALNUM    = 'notAlnum';
    const STRING_EMPTY = 'alnumStringEmpty';

    protected $messageTemplates = array(
        self::INVALID      => "Invalid type given. String, integer or float expected",
        self::NOT_ALNUM    => "The input contains characters which are non alphabetic and no digits",
        self::STRING_EMPTY => "The input is an empty string",
    );
}
"#,
    ),
    (
        "library/Zend/I18n/Validator/Alpha.php",
        r#"<?php
namespace Zend\I18n\Validator;

class Alpha extends Alnum
{
    const NOT_ALPHA = 'notAlpha';

    protected $messageTemplates = array(
        self::INVALID      => "Invalid type given. String expected",
        self::NOT_ALPHA    => "The input contains non alphabetic characters",
        self::STRING_EMPTY => "The input is an empty string",
    );
}
"#,
    ),
];

/// Output generated from `LIBRARY` without previous translations.
pub const EXPECTED_OUTPUT: &str = r#"<?php
return array(
    // Zend_I18n_Validator_Alnum
    "alnumInvalid" => "Invalid type given. String, integer or float expected",
    "notAlnum" => "The input contains characters which are non alphabetic and no digits",
    "alnumStringEmpty" => "The input is an empty string",

    // Zend_I18n_Validator_Alpha
    // "alnumInvalid" - same message already appeared above.
    "notAlpha" => "The input contains non alphabetic characters",
    // "alnumStringEmpty" - same message already appeared above.

    // Zend_Validator_Digits
    "notDigits" => "The input must contain only digits",
    "digitsStringEmpty" => "The input is an empty string",
    "digitsInvalid" => "Invalid type given. String, integer or float expected",

    // Zend_Validator_NotEmpty
    "isEmpty" => "Value is required and can't be empty",
    "notEmptyInvalid" => "Invalid type given. String, integer, float, boolean or array expected",

);
"#;

pub const DEFAULT_DESTINATION: &str = "resources/Zend_Validate.php";
