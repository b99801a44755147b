//! File edit applier.
//!
//! Edits address the original file content. They are applied from the
//! highest start offset to the lowest, so every edit still to be applied sits
//! strictly before the already rewritten tail and its offsets stay valid.

use errnumgen_error::{Error, Result};

/// Replace the half-open byte range `start..end` with `replacement`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    pub fn new(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Length change this edit causes; positive when the text grows.
    pub fn length_delta(&self) -> i64 {
        let removed = i64::try_from(self.end - self.start).unwrap_or(i64::MAX);
        let added = i64::try_from(self.replacement.len()).unwrap_or(i64::MAX);
        added - removed
    }
}

/// All pending edits of one file.
#[derive(Clone, Debug, Default)]
pub struct FileEdits {
    edits: Vec<Edit>,
}

impl FileEdits {
    pub fn new() -> Self {
        Self { edits: Vec::new() }
    }

    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Edits sorted by start offset, descending.
    fn descending(&self) -> Vec<&Edit> {
        let mut sorted: Vec<&Edit> = self.edits.iter().collect();
        sorted.sort_by(|a, b| b.start.cmp(&a.start).then(b.end.cmp(&a.end)));
        sorted
    }

    /// Fail on the first pair of overlapping edits. Touching edits are fine.
    pub fn check_overlaps(&self) -> Result<()> {
        let sorted = self.descending();
        for pair in sorted.windows(2) {
            let (later, earlier) = (pair[0], pair[1]);
            if earlier.end > later.start {
                return Err(
                    Error::edit_overlap((earlier.start, earlier.end), (later.start, later.end))
                        .with_operation("edit::check_overlaps"),
                );
            }
        }
        Ok(())
    }

    /// Produce the new content from the original bytes.
    pub fn apply(&self, original: &[u8]) -> Result<Vec<u8>> {
        self.check_overlaps()?;

        let mut content = original.to_vec();
        for edit in self.descending() {
            if edit.start > edit.end || edit.end > original.len() {
                return Err(Error::structural(format!(
                    "edit {}..{} out of bounds for {} bytes",
                    edit.start,
                    edit.end,
                    original.len()
                ))
                .with_operation("edit::apply"));
            }
            content.splice(edit.start..edit.end, edit.replacement.bytes());
        }
        Ok(content)
    }

    /// Same as [`FileEdits::apply`], for UTF-8 text.
    pub fn apply_str(&self, original: &str) -> Result<String> {
        let bytes = self.apply(original.as_bytes())?;
        String::from_utf8(bytes).map_err(|e| {
            Error::unexpected("edited content is not valid UTF-8")
                .with_operation("edit::apply_str")
                .set_source(e)
        })
    }

    /// Total length change of all edits.
    pub fn total_delta(&self) -> i64 {
        self.edits.iter().map(Edit::length_delta).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errnumgen_error::ErrorKind;

    #[test]
    fn test_simple_replace() {
        let mut edits = FileEdits::new();
        edits.push(Edit::new(6, 11, "Go"));
        assert_eq!(edits.apply_str("Hello World!").unwrap(), "Hello Go!");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let src = "return a, b, c";
        let mut forward = FileEdits::new();
        forward.push(Edit::new(7, 8, "A(a)"));
        forward.push(Edit::new(13, 14, "C(c)"));
        let mut backward = FileEdits::new();
        backward.push(Edit::new(13, 14, "C(c)"));
        backward.push(Edit::new(7, 8, "A(a)"));

        assert_eq!(forward.apply_str(src).unwrap(), "return A(a), b, C(c)");
        assert_eq!(backward.apply_str(src).unwrap(), "return A(a), b, C(c)");
    }

    #[test]
    fn test_matches_one_at_a_time_with_recomputed_offsets() {
        let src = "f(x); g(yy); h(zzz)";
        let spans = [(2, 3, "W(x)"), (8, 10, "W(yy)"), (15, 18, "W(zzz)")];

        let mut edits = FileEdits::new();
        for (s, e, r) in spans {
            edits.push(Edit::new(s, e, r));
        }
        let batched = edits.apply_str(src).unwrap();

        // Apply lowest first, shifting later spans by the running delta.
        let mut current = src.to_string();
        let mut shift: i64 = 0;
        for (s, e, r) in spans {
            let s = (s as i64 + shift) as usize;
            let e = (e as i64 + shift) as usize;
            current.replace_range(s..e, r);
            shift += Edit::new(0, e - s, r).length_delta();
        }

        assert_eq!(batched, current);
        assert_eq!(batched, "f(W(x)); g(W(yy)); h(W(zzz))");
    }

    #[test]
    fn test_adjacent_edits_do_not_conflict() {
        let mut edits = FileEdits::new();
        edits.push(Edit::new(0, 5, "aaa"));
        edits.push(Edit::new(5, 10, "bbb"));
        assert!(edits.check_overlaps().is_ok());
        assert_eq!(edits.apply_str("01234567890").unwrap(), "aaabbb0");
    }

    #[test]
    fn test_overlap_is_rejected() {
        let mut edits = FileEdits::new();
        edits.push(Edit::new(5, 15, "aaa"));
        edits.push(Edit::new(10, 20, "bbb"));
        let err = edits.apply(b"hello world testing!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EditOverlap);
    }

    #[test]
    fn test_out_of_bounds_is_rejected() {
        let mut edits = FileEdits::new();
        edits.push(Edit::new(3, 100, "x"));
        let err = edits.apply(b"short").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralAssumptionViolation);
    }

    #[test]
    fn test_empty_is_identity() {
        let edits = FileEdits::new();
        assert!(edits.is_empty());
        assert_eq!(edits.apply_str("unchanged").unwrap(), "unchanged");
    }

    #[test]
    fn test_multibyte_content_is_preserved() {
        // "é" is two bytes; offsets are byte based.
        let src = "x := \"héllo\"; return err";
        let start = src.find("err").unwrap();
        let mut edits = FileEdits::new();
        edits.push(Edit::new(start, start + 3, "wrap(err)"));
        assert_eq!(edits.apply_str(src).unwrap(), "x := \"héllo\"; return wrap(err)");
    }

    #[test]
    fn test_total_delta() {
        let mut edits = FileEdits::new();
        edits.push(Edit::new(0, 0, "abc"));
        edits.push(Edit::new(10, 20, ""));
        edits.push(Edit::new(5, 7, "hello"));
        assert_eq!(edits.total_delta(), -4);
    }
}
