use std::process::ExitCode;

/// Exit status for the CLI, following common conventions for build tools.
///
/// - `Success` (0): compilation completed
/// - `Failure` (1): compilation failed (bad input)
/// - `Error` (2): internal error (e.g. the watcher could not start)
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
