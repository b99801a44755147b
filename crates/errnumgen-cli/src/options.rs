//! Command-line options for errnumgen.

use std::path::PathBuf;

use clap::Args;

use errnumgen_registry::DEFAULT_PACKAGE;

/// Everything one invocation needs.
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Root directory of the Go sources.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Package name of the generated registry.
    #[arg(long = "out-pkg", value_name = "NAME", default_value = DEFAULT_PACKAGE)]
    pub out_pkg: String,

    /// Registry file path [default: <DIR>/<out-pkg>/errnums.go]
    #[arg(long = "out-file", value_name = "FILE")]
    pub out_file: Option<PathBuf>,

    /// Paths to leave untouched, comma separated (repeatable).
    #[arg(long, value_name = "PATHS", action = clap::ArgAction::Append)]
    pub skip: Vec<String>,

    /// Print the would-be contents instead of writing them.
    #[arg(long)]
    pub dry: bool,

    /// Keep a `<file>.bkp` copy of every rewritten source.
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub bkp: bool,

    /// Also rewrite `_test.go` files.
    #[arg(long)]
    pub tests: bool,

    /// Log phase timings and counts.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            out_pkg: DEFAULT_PACKAGE.to_string(),
            out_file: None,
            skip: Vec::new(),
            dry: false,
            bkp: true,
            tests: false,
            verbose: false,
        }
    }

    pub fn with_out_pkg(mut self, out_pkg: impl Into<String>) -> Self {
        self.out_pkg = out_pkg.into();
        self
    }

    pub fn with_out_file(mut self, out_file: Option<PathBuf>) -> Self {
        self.out_file = out_file;
        self
    }

    pub fn with_skip(mut self, skip: impl Into<String>) -> Self {
        self.skip.push(skip.into());
        self
    }

    pub fn with_dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }

    pub fn with_bkp(mut self, bkp: bool) -> Self {
        self.bkp = bkp;
        self
    }

    pub fn with_tests(mut self, tests: bool) -> Self {
        self.tests = tests;
        self
    }

    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            dry_run: self.dry,
            backup: self.bkp,
        }
    }
}

/// How results reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    pub dry_run: bool,
    pub backup: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
        }
    }
}
