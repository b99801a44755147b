//! The seam between discovery and rewriting.
//!
//! Discovery only needs to know whether to keep a candidate; the knowledge of
//! what an already wrapped expression looks like lives with the implementor.

use tree_sitter::Node;

use crate::file::SourceFile;

/// An expression in the error slot of a return statement, before classification.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'t> {
    pub node: Node<'t>,
    pub source: &'t SourceFile,
}

impl<'t> Candidate<'t> {
    pub fn new(node: Node<'t>, source: &'t SourceFile) -> Self {
        Self { node, source }
    }

    pub fn start(&self) -> usize {
        self.node.start_byte()
    }

    pub fn end(&self) -> usize {
        self.node.end_byte()
    }

    /// Verbatim source text of the expression; `None` when the node range
    /// does not address valid UTF-8 in `source`.
    pub fn text(&self) -> Option<&'t str> {
        self.source.get_text(self.start(), self.end())
    }

    /// Text of any node of the same file.
    pub fn text_of(&self, node: Node<'_>) -> Option<&'t str> {
        self.source.get_text(node.start_byte(), node.end_byte())
    }

    pub fn line(&self) -> usize {
        self.source.line_of(self.start())
    }
}

/// Why a candidate is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Already wrapped by a previous run; carries the recovered identifier
    /// when its numeric suffix parsed.
    AlreadyWrapped { id: Option<u32> },
    /// Excluded for any other reason.
    Excluded,
}

/// Outcome of classifying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Schedule,
    Skip(SkipReason),
}

/// Decides, per candidate, whether it gets rewritten.
pub trait SiteClassifier {
    fn classify(&mut self, candidate: &Candidate<'_>) -> Verdict;
}

impl<C: SiteClassifier + ?Sized> SiteClassifier for &mut C {
    fn classify(&mut self, candidate: &Candidate<'_>) -> Verdict {
        (**self).classify(candidate)
    }
}

/// Schedules every candidate. Useful to inspect raw discovery.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScheduleAll;

impl SiteClassifier for ScheduleAll {
    fn classify(&mut self, _candidate: &Candidate<'_>) -> Verdict {
        Verdict::Schedule
    }
}
