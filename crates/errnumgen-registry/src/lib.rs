//! Identifier registry for errnumgen.
//!
//! Assigns sequential identifiers to newly found error returns, recovers the
//! highest identifier already in use, wraps each site as
//! `<pkg>.New(<pkg>.N_<id>, <original>)` and renders the companion file that
//! declares every identifier.

pub mod counter;
pub mod generator;
pub mod options;
pub mod render;
pub mod wrap;

pub use counter::IdCounter;
pub use generator::{GenerateOutput, Generator, RewritePlan};
pub use options::GenOptions;
pub use render::render_registry;
pub use wrap::{WrapClassifier, WrapStrategy};

/// Prefix of every identifier constant.
pub const CONST_PREFIX: &str = "N_";
/// Name of the wrapping constructor in the registry package.
pub const CONSTRUCTOR: &str = "New";
/// Default registry package name.
pub const DEFAULT_PACKAGE: &str = "errnums";
/// Fixed registry file name.
pub const REGISTRY_FILE: &str = "errnums.go";
