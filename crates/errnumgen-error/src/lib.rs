//! # errnumgen-error
//!
//! Unified error handling for errnumgen.
//!
//! - **ErrorKind**: what went wrong (e.g. `SyntaxError`, `MalformedRewrite`)
//! - **ErrorStatus**: whether the run can continue past it
//! - **Context**: file, line and offsets attached as key/value pairs
//! - **Source**: the underlying error, boxed, never leaked as a raw type
//!
//! ```rust
//! use errnumgen_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::SyntaxError, "1 malformed file")
//!         .with_operation("loader::load_units")
//!         .with_context("file", "pkg/proto.go"))
//! }
//! ```
//!
//! All fallible functions return `Result<T, errnumgen_error::Error>`. An error
//! is raised once; callers further up only append context.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the errnumgen [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
