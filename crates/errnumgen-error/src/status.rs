//! Error status: does the run stop or go on.

use std::fmt;

/// The status of an error, deciding how the pipeline reacts to it.
///
/// - `Fatal`: the run aborts before anything is written
/// - `Recoverable`: the offending site is skipped and the error is logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorStatus {
    /// Abort the whole run.
    #[default]
    Fatal,

    /// Skip the current site and keep going.
    ///
    /// Examples: UnexpectedResultArity
    Recoverable,
}

impl ErrorStatus {
    /// Check if the run may continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorStatus::Recoverable)
    }

    /// Get status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Fatal => "fatal",
            ErrorStatus::Recoverable => "recoverable",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
