use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): the run finished and logged no error
/// - `Failure` (1): the run finished but logged errors
/// - `Error` (2): the run could not start (bad config, unreadable root)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
