//! Run pipeline: options -> generate -> print or commit.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::info;

use errnumgen_registry::Generator;

use crate::RunOptions;
use crate::discovery::gen_options;
use crate::output::{commit, print_dry_run};
use crate::profile::profile_phase;

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub registry: PathBuf,
    /// Rewritten sources, in path order.
    pub modified: Vec<PathBuf>,
    pub new_sites: usize,
    pub counter: u32,
    pub dry_run: bool,
}

/// Generate and then print (`--dry`) or commit the results.
pub fn run_pipeline(opts: &RunOptions, out: &mut dyn Write) -> anyhow::Result<RunSummary> {
    let gen_opts = gen_options(opts)?;
    let root = gen_opts.root.clone();

    let generate_start = Instant::now();
    let output = profile_phase("generate", || Generator::new(gen_opts)?.generate())
        .with_context(|| format!("generating error numbers under {}", root.display()))?;
    info!(
        "Generation: {:.2}s",
        generate_start.elapsed().as_secs_f64()
    );

    let summary = RunSummary {
        registry: output.out_path.clone(),
        modified: output.sources.keys().cloned().collect(),
        new_sites: output.new_sites,
        counter: output.counter,
        dry_run: opts.dry,
    };

    let commit_opts = opts.commit_options();
    if commit_opts.dry_run {
        print_dry_run(&output, out).context("printing dry run")?;
    } else {
        let write_start = Instant::now();
        profile_phase("commit", || commit(&output, &commit_opts))?;
        info!(
            "Wrote {} files: {:.2}s",
            summary.modified.len() + 1,
            write_start.elapsed().as_secs_f64()
        );
    }
    Ok(summary)
}
