//! Resolves the effective generation options.
//!
//! Layering, lowest to highest: built-in defaults, `.msgresrc.json`,
//! `LIB_PATH`, command-line flags. Explicit scan directories (flag, then
//! config) take precedence over the ones derived from the library root.

use std::{env, path::PathBuf};

use anyhow::{Context, Result, bail};

use super::args::Arguments;
use crate::config::{Config, default_template_dirs, is_identifier, load_config};
use crate::core::GenerateOptions;

pub fn resolve_options(args: Arguments) -> Result<GenerateOptions> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let loaded = load_config(&cwd)?;
    merge_options(loaded.config, args)
}

pub(crate) fn merge_options(config: Config, args: Arguments) -> Result<GenerateOptions> {
    let template_dirs = if !args.message_templates_dirs.is_empty() {
        args.message_templates_dirs
    } else if let Some(library) = args.library.filter(|_| config.message_templates_dirs.is_empty()) {
        default_template_dirs(&library)
    } else {
        config.template_dirs()
    };

    let property = args.property.unwrap_or(config.property_name);
    if !is_identifier(&property) {
        bail!("Invalid property name: \"{}\" is not a PHP identifier", property);
    }

    Ok(GenerateOptions {
        template_dirs,
        destination: args
            .destination
            .unwrap_or_else(|| PathBuf::from(&config.destination)),
        previous: args.previous.or(config.previous.map(PathBuf::from)),
        property,
        extensions: config.extensions,
        ignores: config.ignores,
        dry_run: args.dry_run,
    })
}
