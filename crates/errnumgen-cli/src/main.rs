use std::io;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use errnumgen_cli::{RunOptions, run_main};

#[derive(Parser, Debug)]
#[command(
    name = "errnumgen",
    about = "errnumgen: hardcode a unique number into every Go error return",
    version
)]
pub struct Cli {
    #[command(flatten)]
    run: RunOptions,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

pub fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.run.verbose);

    let total_start = Instant::now();
    let stdout = io::stdout();
    let summary = run_main(&args.run, &mut stdout.lock())?;

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(
        total_secs,
        new_sites = summary.new_sites,
        counter = summary.counter,
        "complete"
    );
    if !summary.dry_run && args.run.verbose {
        eprintln!(
            "Wrapped {} sites in {} files, registry {} ({total_secs:.2}s)",
            summary.new_sites,
            summary.modified.len(),
            summary.registry.display()
        );
    }
    Ok(())
}
