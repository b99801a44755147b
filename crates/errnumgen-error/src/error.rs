//! The main Error type for errnumgen.

use std::fmt;
use std::path::Path;

use crate::{ErrorKind, ErrorStatus};

/// Unified error type for all errnumgen operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_recoverable() {
            ErrorStatus::Recoverable
        } else {
            ErrorStatus::Fatal
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error status.
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Get the operation that caused this error.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up the first context value stored under `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the source error (if any).
    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_ref().map(|e| e.as_ref())
    }

    /// Check if the run may continue past this error.
    pub fn is_recoverable(&self) -> bool {
        self.status.is_recoverable()
    }

    /// Set the operation that caused this error.
    ///
    /// A previously set operation is moved to context as "called" so the
    /// call chain survives.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error.
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the offending path.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }

    /// Wrap an IO error raised while touching `path`.
    pub fn io(err: std::io::Error, path: &Path) -> Self {
        Self::from(err).with_path(path)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.status)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::new(ErrorKind::Unexpected, msg)
    }
}

impl Error {
    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create a ConfigInvalid error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a NoSourceFound error for the given root.
    pub fn no_source_found(root: &Path) -> Self {
        Self::new(
            ErrorKind::NoSourceFound,
            format!("no declarations found in {}", root.display()),
        )
        .with_path(root)
    }

    /// Create a SyntaxError listing every malformed file.
    pub fn syntax_error(files: &[String]) -> Self {
        let mut err = Self::new(
            ErrorKind::SyntaxError,
            format!("failed to parse {} file(s)", files.len()),
        )
        .with_context("count", files.len().to_string());
        for file in files {
            err = err.with_context("file", file.clone());
        }
        err
    }

    /// Create a StructuralAssumptionViolation error.
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralAssumptionViolation, message)
    }

    /// Create a MalformedRewrite error carrying the rejected text.
    pub fn malformed_rewrite(replacement: impl Into<String>) -> Self {
        let replacement = replacement.into();
        Self::new(
            ErrorKind::MalformedRewrite,
            format!("replacement is not a valid expression: {}", replacement),
        )
        .with_context("replacement", replacement)
    }

    /// Create an UnexpectedResultArity note.
    pub fn unexpected_arity(found: usize, declared: usize) -> Self {
        Self::new(
            ErrorKind::UnexpectedResultArity,
            format!("unexpected number of returned values: {found}/{declared}"),
        )
        .with_context("found", found.to_string())
        .with_context("declared", declared.to_string())
    }

    /// Create an EditOverlap error.
    pub fn edit_overlap(first: (usize, usize), second: (usize, usize)) -> Self {
        Self::new(
            ErrorKind::EditOverlap,
            format!(
                "edits overlap: {}..{} and {}..{}",
                first.0, first.1, second.0, second.1
            ),
        )
    }

    /// Create a TemplateFailed error.
    pub fn template_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TemplateFailed, message)
    }

    /// Create a TraversalFailed error.
    pub fn traversal_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TraversalFailed, message)
    }
}
