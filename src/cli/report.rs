//! Terminal output for a generation run.
//!
//! Warnings go to stderr. The summary goes to stdout, except in dry-run mode
//! where stdout carries only the rendered file.

use std::io::{self, Write};

use colored::Colorize;

use crate::core::{GenerateOptions, GenerateResult, error::SourceWarning};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(result: &GenerateResult, options: &GenerateOptions, verbose: bool) -> io::Result<()> {
    print_to(
        result,
        options,
        verbose,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

/// A failed write of the rendered file in dry-run mode is an error; the
/// diagnostics around it are best effort.
pub fn print_to<O: Write, E: Write>(
    result: &GenerateResult,
    options: &GenerateOptions,
    verbose: bool,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    print_warnings_to(&result.warnings, err);

    if result.written {
        print_summary_to(result, options, verbose, out);
    } else {
        out.write_all(result.output.as_bytes())?;
        out.flush()?;
        print_summary_to(result, options, verbose, err);
    }
    Ok(())
}

pub fn print_warnings_to<W: Write>(warnings: &[SourceWarning], writer: &mut W) {
    for warning in warnings {
        let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), warning);
    }
}

pub fn print_summary_to<W: Write>(
    result: &GenerateResult,
    options: &GenerateOptions,
    verbose: bool,
    writer: &mut W,
) {
    if verbose {
        let dirs: Vec<_> = options
            .template_dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        let _ = writeln!(
            writer,
            "Scanned {} in {}, found {}",
            plural(result.files_scanned, "file", "files"),
            dirs.join(", ").cyan(),
            plural(result.classes_found, "class", "classes")
        );
        for class in &result.template_classes {
            let _ = writeln!(
                writer,
                "  {} {} ({})",
                class.identity.bold(),
                plural(class.message_count, "template", "templates"),
                class.file_path.display().to_string().dimmed()
            );
        }
    }

    let messages = plural(result.merge.message_count(), "message", "messages");
    let classes = plural(result.merge.groups.len(), "class", "classes");
    let headline = if result.written {
        format!(
            "Wrote {} from {} to {}",
            messages,
            classes,
            result.destination.display()
        )
    } else {
        format!(
            "Rendered {} from {} (dry run, {} not written)",
            messages,
            classes,
            result.destination.display()
        )
    };
    let _ = writeln!(
        writer,
        "{} {} ({} translated, {} suppressed)",
        SUCCESS_MARK.green(),
        headline.green(),
        result.merge.translated_count(),
        plural(result.merge.duplicate_count(), "duplicate", "duplicates")
    );
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}
