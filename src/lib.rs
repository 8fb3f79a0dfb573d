//! msgres - message resource generator for PHP validator libraries
//!
//! Scans library classes for their declared message-template tables, merges
//! them into one deduplicated key to message table, overlays translations
//! from a previously generated file, and writes the result as a PHP data
//! file. Source files are analysed statically; nothing is executed.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, option resolution, output)
//! - `config`: Configuration file loading and parsing
//! - `core`: Generation pipeline (scan, extract, merge, render)

pub mod cli;
pub mod config;
pub mod core;
