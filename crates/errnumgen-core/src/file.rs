//! Source file handling.
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The original, immutable bytes of one source file.
///
/// Every byte offset handed around by discovery refers to this content,
/// never to an already edited buffer.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    content: Arc<[u8]>,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: Vec<u8>) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            content
                .iter()
                .enumerate()
                .filter(|(_, b)| **b == b'\n')
                .map(|(i, _)| i + 1),
        );

        SourceFile {
            path,
            content: Arc::from(content),
            line_starts,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        self.content.as_ref()
    }

    /// Whether `needle` occurs anywhere in the raw bytes.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        if needle.is_empty() {
            return true;
        }
        self.content().windows(needle.len()).any(|w| w == needle)
    }

    /// Text of the half-open byte range `start..end`, if it is in bounds and valid UTF-8.
    pub fn get_text(&self, start: usize, end: usize) -> Option<&str> {
        let bytes = self.content();
        if start > end || end > bytes.len() {
            return None;
        }
        std::str::from_utf8(&bytes[start..end]).ok()
    }

    /// 1-based line of a byte offset.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// Short name used in log lines.
    pub fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}
