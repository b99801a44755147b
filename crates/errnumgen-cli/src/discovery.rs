//! Turning command-line values into generator options.

use std::path::{Path, PathBuf};

use errnumgen_error::{Error, Result};
use errnumgen_registry::GenOptions;

use crate::RunOptions;

/// The root must exist and be a directory.
pub fn resolve_root(dir: &Path) -> Result<PathBuf> {
    let meta = std::fs::metadata(dir)
        .map_err(|e| Error::io(e, dir).with_operation("discovery::resolve_root"))?;
    if !meta.is_dir() {
        return Err(
            Error::config_invalid(format!("{} is not a directory", dir.display()))
                .with_operation("discovery::resolve_root"),
        );
    }
    Ok(dir.to_path_buf())
}

/// Split comma separated skip values, dropping blanks.
pub fn split_skip_list(values: &[String]) -> Vec<PathBuf> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn gen_options(opts: &RunOptions) -> Result<GenOptions> {
    let root = resolve_root(&opts.dir)?;
    let gen_opts = GenOptions::new(root)
        .with_out_package(opts.out_pkg.clone())
        .with_out_path(opts.out_file.clone())
        .with_skip_paths(split_skip_list(&opts.skip))
        .with_include_tests(opts.tests);
    gen_opts.validate()?;
    Ok(gen_opts)
}
