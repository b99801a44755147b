use std::fmt;
use std::path::{Path, PathBuf};

use tree_sitter::Tree;

use crate::file::SourceFile;
use crate::lang::LangGo;

/// One file of a compilation unit.
///
/// `tree` is `None` when the cheap pre-filter decided the file cannot hold a
/// relevant return; such a file counts as parsed with zero declarations.
#[derive(Debug)]
pub struct UnitFile {
    pub source: SourceFile,
    pub tree: Option<Tree>,
}

impl UnitFile {
    pub fn new(source: SourceFile, tree: Option<Tree>) -> Self {
        Self { source, tree }
    }

    pub fn path(&self) -> &Path {
        self.source.path()
    }

    /// Number of top-level declarations.
    pub fn decl_count(&self) -> usize {
        let Some(tree) = &self.tree else {
            return 0;
        };
        let root = tree.root_node();
        let mut cursor = root.walk();
        root.named_children(&mut cursor)
            .filter(|n| LangGo::is_top_level_decl(*n))
            .count()
    }
}

/// Where a syntax node sits, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: PathBuf,
    pub line: usize,
    pub offset: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// A Go package: the source files of one directory, parsed together.
#[derive(Debug)]
pub struct CompileUnit {
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<UnitFile>,
}

impl CompileUnit {
    pub fn decl_count(&self) -> usize {
        self.files.iter().map(UnitFile::decl_count).sum()
    }

    /// Resolve a byte offset in one of the unit's files.
    pub fn position(&self, file_index: usize, offset: usize) -> Option<Position> {
        let file = self.files.get(file_index)?;
        Some(Position {
            file: file.path().to_path_buf(),
            line: file.source.line_of(offset),
            offset,
        })
    }
}

/// Every compilation unit found below a root directory, in directory order.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub units: Vec<CompileUnit>,
}

impl Project {
    pub fn decl_count(&self) -> usize {
        self.units.iter().map(CompileUnit::decl_count).sum()
    }

    pub fn file_count(&self) -> usize {
        self.units.iter().map(|u| u.files.len()).sum()
    }

    /// Look a file up by path across all units.
    pub fn find_file(&self, path: &Path) -> Option<&UnitFile> {
        self.units
            .iter()
            .flat_map(|u| u.files.iter())
            .find(|f| f.path() == path)
    }
}
