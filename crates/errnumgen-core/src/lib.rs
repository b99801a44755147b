//! Discovery and rewrite engine for errnumgen.
//!
//! Loads Go packages, keeps the functions that return an `error`, finds the
//! expression in the error slot of every return statement and splices
//! replacements into the original bytes.

pub mod classify;
pub mod context;
pub mod edit;
pub mod file;
pub mod filter;
pub mod finder;
pub mod lang;
pub mod loader;

pub use classify::{Candidate, ScheduleAll, SiteClassifier, SkipReason, Verdict};
pub use context::{CompileUnit, Position, Project, UnitFile};
pub use edit::{Edit, FileEdits};
pub use errnumgen_error::{Error, ErrorKind, Result};
pub use file::SourceFile;
pub use filter::{Declaration, FilteredFile, FilteredUnit, ResultLayout, filter_unit};
pub use finder::{DiscoveryReport, ErrorExpression, ErrorNodeFinder, FileSites};
pub use lang::LangGo;
pub use loader::{FsReader, LoadOptions, SkipList, SourceLoader, SourceReader};
pub use tree_sitter::{Node, Tree};
