//! Source loading: walk the root, read, pre-filter and parse every Go file.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

use errnumgen_error::{Error, Result};

use crate::context::{CompileUnit, Project, UnitFile};
use crate::file::SourceFile;
use crate::lang::{self, LangGo};

/// Reads the original bytes of a source file.
pub trait SourceReader: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads straight from the filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Absolute paths excluded from loading and rewriting.
#[derive(Debug, Default, Clone)]
pub struct SkipList {
    paths: Vec<PathBuf>,
}

impl SkipList {
    /// Build a skip list, turning every entry into an absolute path.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut list = Self::default();
        for path in paths {
            list.push(path.as_ref())?;
        }
        Ok(list)
    }

    pub fn push(&mut self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Ok(());
        }
        let abs = std::path::absolute(path).map_err(|e| {
            Error::config_invalid(format!("invalid skip path {}", path.display()))
                .with_operation("loader::SkipList::push")
                .set_source(e)
        })?;
        if !self.paths.contains(&abs) {
            self.paths.push(abs);
        }
        Ok(())
    }

    /// Whether `path` is one of the skipped paths or lies below one.
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| path.starts_with(p))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Options for loading a source tree.
#[derive(Debug, Default, Clone)]
pub struct LoadOptions {
    pub skip: SkipList,
    /// Also load `_test.go` files.
    pub include_tests: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip(mut self, skip: SkipList) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }
}

/// Directories the go tool never treats as packages of `./...`.
fn should_skip_dir(name: &str) -> bool {
    name == "testdata" || name == "vendor" || name.starts_with('.') || name.starts_with('_')
}

fn is_source_file(path: &Path, include_tests: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !LangGo::supported_extensions().contains(&ext) {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    include_tests || !name.ends_with("_test.go")
}

/// Cheap check on raw bytes: a relevant return needs both keywords.
fn may_contain_error_return(source: &SourceFile) -> bool {
    source.mentions("return") && source.mentions(LangGo::ERROR_TYPE)
}

/// Loads every compilation unit below a root directory.
pub struct SourceLoader {
    root: PathBuf,
    options: LoadOptions,
    reader: Arc<dyn SourceReader>,
}

impl SourceLoader {
    pub fn new(root: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            root: root.into(),
            options,
            reader: Arc::new(FsReader),
        }
    }

    pub fn with_reader(mut self, reader: Arc<dyn SourceReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Walk, read and parse. Aborts on the first read failure and after
    /// parsing when any file is malformed.
    pub fn load(&self) -> Result<Project> {
        let start = Instant::now();
        let root = std::path::absolute(&self.root).map_err(|e| {
            Error::io(e, &self.root).with_operation("loader::load")
        })?;

        let packages = self.discover(&root)?;
        let paths: Vec<(usize, PathBuf)> = packages
            .values()
            .enumerate()
            .flat_map(|(unit, files)| files.iter().map(move |f| (unit, f.clone())))
            .collect();

        let loaded = paths
            .into_par_iter()
            .map(|(unit, path)| self.load_file(&path).map(|file| (unit, file)))
            .collect::<Result<Vec<_>>>()?;

        let malformed: Vec<String> = loaded
            .iter()
            .filter(|(_, f)| f.malformed)
            .map(|(_, f)| f.file.source.display_name())
            .collect();
        if !malformed.is_empty() {
            return Err(Error::syntax_error(&malformed).with_operation("loader::load"));
        }

        let mut files_by_unit: Vec<Vec<UnitFile>> = packages.keys().map(|_| Vec::new()).collect();
        for (unit, loaded) in loaded {
            files_by_unit[unit].push(loaded.file);
        }

        let units: Vec<CompileUnit> = packages
            .into_keys()
            .zip(files_by_unit)
            .map(|(dir, files)| {
                let name = files
                    .iter()
                    .find_map(|f| {
                        let tree = f.tree.as_ref()?;
                        lang::package_name(tree, f.source.content())
                    })
                    .or_else(|| dir.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_default();
                CompileUnit { name, dir, files }
            })
            .collect();

        let project = Project { root, units };
        info!(
            "Loaded {} units, {} files, {} declarations in {:.2}s",
            project.units.len(),
            project.file_count(),
            project.decl_count(),
            start.elapsed().as_secs_f64()
        );

        if project.decl_count() == 0 {
            return Err(Error::no_source_found(&project.root).with_operation("loader::load"));
        }
        Ok(project)
    }

    /// Collect Go files grouped by directory, both in sorted order.
    fn discover(&self, root: &Path) -> Result<BTreeMap<PathBuf, Vec<PathBuf>>> {
        let skip = self.options.skip.clone();
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(true)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if skip.contains(entry.path()) {
                    return false;
                }
                let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
                if !is_dir {
                    return true;
                }
                let Some(name) = entry.file_name().to_str() else {
                    return true;
                };
                !should_skip_dir(name)
            });

        let mut packages: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for entry in builder.build() {
            let entry = entry.map_err(|e| {
                Error::traversal_failed(format!("failed to walk directory {}: {e}", root.display()))
                    .with_operation("loader::discover")
                    .set_source(e)
            })?;
            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }
            let path = entry.path();
            if !is_source_file(path, self.options.include_tests) {
                continue;
            }
            let dir = path.parent().unwrap_or(root).to_path_buf();
            packages.entry(dir).or_default().push(path.to_path_buf());
        }

        for files in packages.values_mut() {
            files.sort();
        }
        debug!(packages = packages.len(), "discovered packages");
        Ok(packages)
    }

    fn load_file(&self, path: &Path) -> Result<LoadedFile> {
        let content = self
            .reader
            .read(path)
            .map_err(|e| Error::io(e, path).with_operation("loader::load_file"))?;
        let source = SourceFile::new(path.to_path_buf(), content);

        if std::str::from_utf8(source.content()).is_err() {
            return Ok(LoadedFile::malformed(source));
        }
        if !may_contain_error_return(&source) {
            debug!(file = %path.display(), "pre-filter: no return/error, parsed as empty");
            return Ok(LoadedFile::ok(UnitFile::new(source, None)));
        }

        match LangGo::parse(source.content()) {
            Some(tree) if !tree.root_node().has_error() => {
                Ok(LoadedFile::ok(UnitFile::new(source, Some(tree))))
            }
            _ => Ok(LoadedFile::malformed(source)),
        }
    }
}

struct LoadedFile {
    file: UnitFile,
    malformed: bool,
}

impl LoadedFile {
    fn ok(file: UnitFile) -> Self {
        Self {
            file,
            malformed: false,
        }
    }

    fn malformed(source: SourceFile) -> Self {
        Self {
            file: UnitFile::new(source, None),
            malformed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_skip_dir() {
        assert!(should_skip_dir("testdata"));
        assert!(should_skip_dir("vendor"));
        assert!(should_skip_dir(".git"));
        assert!(should_skip_dir("_build"));
        assert!(!should_skip_dir("pkg"));
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("a/b.go"), false));
        assert!(!is_source_file(Path::new("a/b_test.go"), false));
        assert!(is_source_file(Path::new("a/b_test.go"), true));
        assert!(!is_source_file(Path::new("a/b.rs"), true));
        assert!(!is_source_file(Path::new("a/go"), true));
    }

    #[test]
    fn test_skip_list_containment() {
        let skip = SkipList::new(["/repo/gen", "/repo/errnums/errnums.go"]).unwrap();
        assert!(skip.contains(Path::new("/repo/gen")));
        assert!(skip.contains(Path::new("/repo/gen/a.go")));
        assert!(skip.contains(Path::new("/repo/errnums/errnums.go")));
        assert!(!skip.contains(Path::new("/repo/errnums/other.go")));
        assert!(!skip.contains(Path::new("/repo/generated/a.go")));
    }

    #[test]
    fn test_skip_list_ignores_empty_entries() {
        let skip = SkipList::new(["", "/x"]).unwrap();
        assert_eq!(skip.paths().len(), 1);
    }

    #[test]
    fn test_prefilter_needs_both_keywords() {
        let src = |t: &str| SourceFile::new(PathBuf::from("a.go"), t.as_bytes().to_vec());
        assert!(may_contain_error_return(&src("func f() error { return nil }")));
        assert!(!may_contain_error_return(&src("func f() int { return 1 }")));
        assert!(!may_contain_error_return(&src("var e error")));
    }
}
