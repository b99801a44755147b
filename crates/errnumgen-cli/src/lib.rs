//! errnumgen command-line interface.
//!
pub mod discovery;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod profile;

use std::io::Write;

pub use options::{CommitOptions, RunOptions};
pub use pipeline::{RunSummary, run_pipeline};
pub use profile::profile_phase;

/// Main entry point
pub fn run_main(opts: &RunOptions, out: &mut dyn Write) -> anyhow::Result<RunSummary> {
    run_pipeline(opts, out)
}
