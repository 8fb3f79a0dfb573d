//! Command-line interface layer: argument parsing, option resolution and
//! terminal output around `core::generate`.

use anyhow::{Context, Result};

mod args;
mod exit_status;
mod report;
mod run;

pub use args::Arguments;
pub use exit_status::ExitStatus;
pub use report::SUCCESS_MARK;

use crate::core::generate;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose;

    let options = run::resolve_options(args)?;
    let result = generate(&options)?;
    report::print(&result, &options, verbose).context("Failed to write output")?;

    Ok(ExitStatus::Success)
}
