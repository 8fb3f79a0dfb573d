use std::process::ExitCode;

/// Exit status of the generator.
///
/// - `Success` (0): the resource file was generated (or `--help`/`--version` was printed)
/// - `Error` (2): setup failed (bad arguments or config, missing directory, unreadable previous file)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Generation completed; non-fatal warnings do not change the status.
    Success,
    /// Generation aborted.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
