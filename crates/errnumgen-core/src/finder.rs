//! Error node finder.
//!
//! Walks the body of every retained function, depth-first in source order,
//! and picks the expression in the `error` slot of each return statement.
//! Function literals are visited with their own result layout, wherever they
//! appear, so a literal never inherits the slot of its enclosing function.

use std::path::PathBuf;

use tracing::debug;
use tree_sitter::Node;

use errnumgen_error::{Error, Result};

use crate::classify::{Candidate, SiteClassifier, SkipReason, Verdict};
use crate::context::CompileUnit;
use crate::file::SourceFile;
use crate::filter::{Declaration, FilteredUnit, ResultLayout};
use crate::lang::{LangGo, expressions, named_children};

/// An error-slot expression scheduled for rewriting.
///
/// Offsets address the original file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorExpression {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub text: String,
}

/// Scheduled expressions of one file, sorted by start offset.
#[derive(Debug, Clone)]
pub struct FileSites {
    pub path: PathBuf,
    pub sites: Vec<ErrorExpression>,
}

/// Everything discovery found, in unit then file then source order.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub files: Vec<FileSites>,
    /// Recoverable per-site notes (`UnexpectedResultArity`).
    pub notes: Vec<Error>,
    pub already_wrapped: usize,
    pub nil_returns: usize,
}

impl DiscoveryReport {
    pub fn site_count(&self) -> usize {
        self.files.iter().map(|f| f.sites.len()).sum()
    }
}

/// Walks retained declarations and hands error-slot expressions to a classifier.
pub struct ErrorNodeFinder<C> {
    classifier: C,
}

/// State of the file being walked.
struct FileVisit<'a> {
    unit: &'a CompileUnit,
    index: usize,
    source: &'a SourceFile,
    sites: Vec<ErrorExpression>,
}

impl FileVisit<'_> {
    /// `file:line` of a node, for diagnostics.
    fn at(&self, node: Node<'_>) -> String {
        self.unit
            .position(self.index, node.start_byte())
            .map(|pos| pos.to_string())
            .unwrap_or_else(|| self.source.display_name())
    }
}

impl<C: SiteClassifier> ErrorNodeFinder<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Discover every site of a filtered unit and append it to `report`.
    pub fn find_unit(&mut self, unit: &FilteredUnit<'_>, report: &mut DiscoveryReport) -> Result<()> {
        for file in &unit.files {
            let mut visit = FileVisit {
                unit: unit.unit,
                index: file.index,
                source: file.source,
                sites: Vec::new(),
            };
            for decl in &file.decls {
                self.visit_declaration(decl, &mut visit, report)
                    .map_err(|e| e.with_context("unit", unit.unit.name.clone()))?;
            }
            if visit.sites.is_empty() {
                continue;
            }
            visit.sites.sort_by_key(|s| s.start);
            report.files.push(FileSites {
                path: file.source.path().to_path_buf(),
                sites: visit.sites,
            });
        }
        Ok(())
    }

    fn visit_declaration(
        &mut self,
        decl: &Declaration<'_>,
        visit: &mut FileVisit<'_>,
        report: &mut DiscoveryReport,
    ) -> Result<()> {
        let source = visit.source;
        if !LangGo::is_function_kind(decl.node.kind()) {
            return Err(Error::structural(format!(
                "expected a function declaration, found {}",
                decl.node.kind()
            ))
            .with_operation("finder::visit_declaration")
            .with_context("at", visit.at(decl.node)));
        }
        let Some(body) = decl.body() else {
            return Err(Error::structural(format!(
                "function declaration has no body: {}",
                decl.name(source.content())
            ))
            .with_operation("finder::visit_declaration")
            .with_context("at", visit.at(decl.node)));
        };
        if !decl.layout.has_error() {
            return Ok(());
        }

        self.walk(body, decl.layout, visit, report)
    }

    fn walk(
        &mut self,
        node: Node<'_>,
        layout: ResultLayout,
        visit: &mut FileVisit<'_>,
        report: &mut DiscoveryReport,
    ) -> Result<()> {
        for child in named_children(node) {
            let kind = child.kind();
            if kind == LangGo::func_literal {
                self.visit_literal(child, visit, report)?;
            } else if kind == LangGo::return_statement {
                self.visit_return(child, layout, visit, report)?;
            } else {
                self.walk(child, layout, visit, report)?;
            }
        }
        Ok(())
    }

    fn visit_literal(&mut self, literal: Node<'_>, visit: &mut FileVisit<'_>, report: &mut DiscoveryReport) -> Result<()> {
        let layout = ResultLayout::of(literal, visit.source.content());
        match literal.child_by_field_name(LangGo::field_body) {
            Some(body) => self.walk(body, layout, visit, report),
            None => Ok(()),
        }
    }

    fn visit_return(
        &mut self,
        ret: Node<'_>,
        layout: ResultLayout,
        visit: &mut FileVisit<'_>,
        report: &mut DiscoveryReport,
    ) -> Result<()> {
        let exprs: Vec<Node<'_>> = named_children(ret)
            .find(|n| n.kind() == LangGo::expression_list)
            .map(|list| expressions(list).collect())
            .unwrap_or_default();

        let claimed = self.classify_return(ret, &exprs, layout, visit, report)?;

        // Literals inside the returned values. A scheduled or already wrapped
        // expression is owned as a whole; nothing inside it is a site.
        for expr in exprs {
            if claimed.is_some_and(|c| c.id() == expr.id()) {
                continue;
            }
            if expr.kind() == LangGo::func_literal {
                self.visit_literal(expr, visit, report)?;
            } else {
                self.walk(expr, ResultLayout::default(), visit, report)?;
            }
        }
        Ok(())
    }

    /// Classify the error slot of `ret`; returns the slot expression when it
    /// is scheduled or already wrapped.
    fn classify_return<'t>(
        &mut self,
        ret: Node<'t>,
        exprs: &[Node<'t>],
        layout: ResultLayout,
        visit: &mut FileVisit<'_>,
        report: &mut DiscoveryReport,
    ) -> Result<Option<Node<'t>>> {
        let Some(error_index) = layout.error_index else {
            return Ok(None);
        };
        let source = visit.source;

        if exprs.len() != layout.slots {
            // Bare `return` with named results, or a multi-value call
            // forwarded as the only expression.
            let line = source.line_of(ret.start_byte());
            debug!(
                file = %source.display_name(),
                line,
                found = exprs.len(),
                declared = layout.slots,
                "unexpected number of returned values, skipping"
            );
            report.notes.push(
                Error::unexpected_arity(exprs.len(), layout.slots)
                    .with_operation("finder::visit_return")
                    .with_context("file", source.display_name())
                    .with_context("line", line.to_string()),
            );
            return Ok(None);
        }

        let expr = exprs[error_index];
        if LangGo::is_nil(expr, source.content()) {
            report.nil_returns += 1;
            return Ok(None);
        }

        let candidate = Candidate::new(expr, source);
        match self.classifier.classify(&candidate) {
            Verdict::Schedule => {
                let Some(text) = candidate.text() else {
                    return Err(Error::structural(format!(
                        "error expression spans an invalid range {}..{}",
                        candidate.start(),
                        candidate.end()
                    ))
                    .with_operation("finder::visit_return")
                    .with_context("at", visit.at(expr)));
                };
                debug!(
                    file = %source.display_name(),
                    line = candidate.line(),
                    text,
                    "scheduled error return"
                );
                visit.sites.push(ErrorExpression {
                    start: candidate.start(),
                    end: candidate.end(),
                    line: candidate.line(),
                    text: text.to_string(),
                });
                Ok(Some(expr))
            }
            Verdict::Skip(SkipReason::AlreadyWrapped { id }) => {
                debug!(
                    file = %source.display_name(),
                    line = candidate.line(),
                    ?id,
                    "already wrapped"
                );
                report.already_wrapped += 1;
                Ok(Some(expr))
            }
            Verdict::Skip(SkipReason::Excluded) => Ok(None),
        }
    }
}
