//! Writing results: dry-run listing or commit to disk.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use errnumgen_error::{Error, Result};
use errnumgen_registry::GenerateOutput;

use crate::options::CommitOptions;

/// `<path>.bkp`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bkp");
    PathBuf::from(name)
}

/// Print every would-be file instead of writing it.
pub fn print_dry_run(output: &GenerateOutput, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "=== OUTPUT FILE ===")?;
    writeln!(out, "{}", output.registry)?;
    writeln!(out, "=== SOURCE FILES ===")?;
    for (path, content) in &output.sources {
        writeln!(out, "---> {}", path.display())?;
        writeln!(out, "{content}")?;
    }
    Ok(())
}

/// Write the registry, then every rewritten source in place.
///
/// A failure part way leaves earlier files written.
pub fn commit(output: &GenerateOutput, opts: &CommitOptions) -> Result<()> {
    if let Some(dir) = output.out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| Error::io(e, dir).with_operation("output::commit"))?;
    }
    fs::write(&output.out_path, &output.registry)
        .map_err(|e| Error::io(e, &output.out_path).with_operation("output::commit"))?;
    debug!(file = %output.out_path.display(), "wrote registry");

    for (path, content) in &output.sources {
        overwrite_source(path, content, opts.backup)?;
    }
    Ok(())
}

fn overwrite_source(path: &Path, content: &str, backup: bool) -> Result<()> {
    let io_err = |e: io::Error, p: &Path| Error::io(e, p).with_operation("output::overwrite_source");

    let permissions = fs::metadata(path).map_err(|e| io_err(e, path))?.permissions();
    if backup {
        let bkp = backup_path(path);
        let original = fs::read(path).map_err(|e| io_err(e, path))?;
        fs::write(&bkp, original).map_err(|e| io_err(e, &bkp))?;
        fs::set_permissions(&bkp, permissions.clone()).map_err(|e| io_err(e, &bkp))?;
    }
    fs::write(path, content).map_err(|e| io_err(e, path))?;
    fs::set_permissions(path, permissions).map_err(|e| io_err(e, path))?;
    debug!(file = %path.display(), backup, "rewrote source");
    Ok(())
}
