//! Generator options.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use errnumgen_error::{Error, Result};

use crate::{DEFAULT_PACKAGE, REGISTRY_FILE};

static GO_IDENTIFIER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok());

/// What one generator run works on and where the registry goes.
#[derive(Debug, Clone)]
pub struct GenOptions {
    pub root: PathBuf,
    /// Registry package name, also the qualifier of every wrapped site.
    pub out_package: String,
    /// Registry file; `None` means `<root>/<out_package>/errnums.go`.
    pub out_path: Option<PathBuf>,
    /// Extra paths excluded from loading and rewriting.
    pub skip_paths: Vec<PathBuf>,
    pub include_tests: bool,
}

impl GenOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            out_package: DEFAULT_PACKAGE.to_string(),
            out_path: None,
            skip_paths: Vec::new(),
            include_tests: false,
        }
    }

    pub fn with_out_package(mut self, package: impl Into<String>) -> Self {
        self.out_package = package.into();
        self
    }

    pub fn with_out_path(mut self, path: Option<PathBuf>) -> Self {
        self.out_path = path;
        self
    }

    pub fn with_skip_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.skip_paths = paths;
        self
    }

    pub fn with_include_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Where the registry file is written.
    pub fn out_path(&self) -> PathBuf {
        match &self.out_path {
            Some(path) => path.clone(),
            None => default_out_path(&self.root, &self.out_package),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let valid = GO_IDENTIFIER
            .as_ref()
            .is_some_and(|re| re.is_match(&self.out_package));
        if !valid {
            return Err(Error::config_invalid(format!(
                "output package {:?} is not a Go identifier",
                self.out_package
            ))
            .with_operation("options::validate"));
        }
        if self.out_path().file_name().is_none() {
            return Err(Error::config_invalid("output path has no file name")
                .with_operation("options::validate")
                .with_path(&self.out_path()));
        }
        Ok(())
    }
}

/// `<root>/<package>/errnums.go`
pub fn default_out_path(root: &Path, package: &str) -> PathBuf {
    root.join(package).join(REGISTRY_FILE)
}
