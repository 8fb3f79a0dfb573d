//! CLI argument definitions using clap.
//!
//! Every flag overrides the matching `.msgresrc.json` field; `--library`
//! can also come from the `LIB_PATH` environment variable.

use std::path::PathBuf;

use clap::Parser;

/// Generate a PHP message resource file from the message templates declared
/// by library classes.
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Directories to scan, comma separated (default: Zend/I18n and Zend/Validator under the library root)
    #[arg(
        short = 'm',
        long = "messageTemplatesDirs",
        value_name = "DIRS",
        value_delimiter = ','
    )]
    pub message_templates_dirs: Vec<PathBuf>,

    /// Output file (default: resources/Zend_Validate.php)
    #[arg(short, long, value_name = "PATH")]
    pub destination: Option<PathBuf>,

    /// Previously generated file whose translations are kept
    #[arg(short, long, value_name = "PATH")]
    pub previous: Option<PathBuf>,

    /// Library root used to derive the default scan directories
    #[arg(short, long, value_name = "PATH", env = "LIB_PATH")]
    pub library: Option<PathBuf>,

    /// Name of the property holding the message templates (default: messageTemplates)
    #[arg(long, value_name = "NAME")]
    pub property: Option<String>,

    /// Print the generated file to stdout instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
