use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".msgresrc.json";

/// Subdirectories of the library root scanned when no directories are given.
pub const DEFAULT_TEMPLATE_SUBDIRS: &[&str] = &["Zend/I18n", "Zend/Validator"];

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_library")]
    pub library: String,
    #[serde(default)]
    pub message_templates_dirs: Vec<String>,
    #[serde(default = "default_destination")]
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(default = "default_property_name")]
    pub property_name: String,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_library() -> String {
    "library".to_string()
}

fn default_destination() -> String {
    "resources/Zend_Validate.php".to_string()
}

fn default_property_name() -> String {
    "messageTemplates".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library: default_library(),
            message_templates_dirs: Vec::new(),
            destination: default_destination(),
            previous: None,
            property_name: default_property_name(),
            extensions: default_extensions(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid `ignores` globs, an empty extension list,
    /// or a property name that is not a PHP identifier.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if self.extensions.is_empty() {
            bail!("'extensions' must list at least one file extension");
        }

        if !is_identifier(&self.property_name) {
            bail!(
                "Invalid 'propertyName': \"{}\" is not a PHP identifier",
                self.property_name
            );
        }

        Ok(())
    }

    /// Scan directories: the configured list, or the defaults under `library`.
    pub fn template_dirs(&self) -> Vec<PathBuf> {
        if self.message_templates_dirs.is_empty() {
            default_template_dirs(Path::new(&self.library))
        } else {
            self.message_templates_dirs.iter().map(PathBuf::from).collect()
        }
    }
}

pub fn default_template_dirs(library: &Path) -> Vec<PathBuf> {
    DEFAULT_TEMPLATE_SUBDIRS
        .iter()
        .map(|sub| library.join(sub))
        .collect()
}

/// PHP identifier: a letter, underscore or non-ASCII byte, then the same or digits.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the file the config came from; `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
