//! Error kinds for errnumgen operations.

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on the kind to decide between aborting the run and
/// recording a per-site note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Catch-all for unhandled cases.
    Unexpected,

    /// Invalid configuration or command line options.
    ConfigInvalid,

    // =========================================================================
    // Loading errors
    // =========================================================================
    /// The root directory yields zero declarations.
    NoSourceFound,

    /// One or more source files failed structural parsing.
    SyntaxError,

    // =========================================================================
    // Discovery / rewrite errors
    // =========================================================================
    /// An internal invariant about declaration or return shape was violated.
    StructuralAssumptionViolation,

    /// A synthesized replacement does not parse as a standalone expression.
    MalformedRewrite,

    /// A return statement's value count differs from the declared results.
    UnexpectedResultArity,

    /// Two edits scheduled for one file overlap.
    EditOverlap,

    /// The registry template could not be rendered.
    TemplateFailed,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found.
    FileNotFound,

    /// Permission denied.
    PermissionDenied,

    /// Any other IO failure (read, write, backup).
    IoFailed,

    /// Directory traversal failed.
    TraversalFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string.
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check whether this kind lets the run continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ErrorKind::UnexpectedResultArity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::SyntaxError.to_string(), "SyntaxError");
        assert_eq!(ErrorKind::NoSourceFound.as_str(), "NoSourceFound");
    }

    #[test]
    fn test_is_recoverable() {
        assert!(ErrorKind::UnexpectedResultArity.is_recoverable());
        assert!(!ErrorKind::MalformedRewrite.is_recoverable());
        assert!(!ErrorKind::IoFailed.is_recoverable());
    }
}
