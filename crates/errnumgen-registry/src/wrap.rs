//! Edit classifier and synthesizer.
//!
//! A site is already wrapped when it reads `<pkg>.New(<q>.N_<digits>, <inner>)`.
//! Everything else in an error slot gets wrapped with a fresh identifier.

use regex::Regex;
use tracing::trace;

use errnumgen_core::lang::{LangGo, expressions};
use errnumgen_core::{Candidate, SiteClassifier, SkipReason, Verdict};
use errnumgen_error::{Error, Result};

use crate::counter::IdCounter;
use crate::{CONST_PREFIX, CONSTRUCTOR};

/// Knows the wrapped form: recognizes it and produces it.
#[derive(Debug, Clone)]
pub struct WrapStrategy {
    package: String,
    constant: Regex,
}

impl WrapStrategy {
    pub fn new(package: impl Into<String>) -> Result<Self> {
        let pattern = format!(r"^{}(\d+)(.*)$", regex::escape(CONST_PREFIX));
        let constant = Regex::new(&pattern).map_err(|e| {
            Error::unexpected(format!("invalid constant pattern {pattern}"))
                .with_operation("wrap::WrapStrategy::new")
                .set_source(e)
        })?;
        Ok(Self {
            package: package.into(),
            constant,
        })
    }

    /// `Some(id)` when the candidate is already wrapped; the inner `id` is
    /// `None` when the constant's numeric suffix does not parse.
    pub fn recognize(&self, candidate: &Candidate<'_>) -> Option<Option<u32>> {
        let call = candidate.node;
        if call.kind() != LangGo::call_expression {
            return None;
        }

        let callee = call.child_by_field_name(LangGo::field_function)?;
        if callee.kind() != LangGo::selector_expression {
            return None;
        }
        let operand = callee.child_by_field_name(LangGo::field_operand)?;
        let field = callee.child_by_field_name(LangGo::field_field)?;
        if candidate.text_of(operand)? != self.package || candidate.text_of(field)? != CONSTRUCTOR {
            return None;
        }

        let args = call.child_by_field_name(LangGo::field_arguments)?;
        let args: Vec<_> = expressions(args).collect();
        let [constant, _inner] = args.as_slice() else {
            return None;
        };
        if constant.kind() != LangGo::selector_expression {
            return None;
        }
        let name = candidate.text_of(constant.child_by_field_name(LangGo::field_field)?)?;
        let caps = self.constant.captures(name)?;
        let id = match caps.get(2).map(|m| m.as_str()) {
            Some("") => caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()),
            _ => None,
        };
        Some(id)
    }

    /// `<pkg>.New(<pkg>.N_<id>, <original>)`, checked to parse on its own.
    pub fn synthesize(&self, original: &str, id: u32) -> Result<String> {
        let pkg = &self.package;
        let replacement = format!("{pkg}.{CONSTRUCTOR}({pkg}.{CONST_PREFIX}{id}, {original})");
        if !LangGo::is_expression(&replacement) {
            return Err(Error::malformed_rewrite(replacement)
                .with_operation("wrap::synthesize")
                .with_context("id", id.to_string()));
        }
        Ok(replacement)
    }

    /// Classifier recording recovered identifiers into `counter`.
    pub fn classifier<'a>(&'a self, counter: &'a mut IdCounter) -> WrapClassifier<'a> {
        WrapClassifier {
            strategy: self,
            counter,
        }
    }
}

/// [`SiteClassifier`] backed by a [`WrapStrategy`].
#[derive(Debug)]
pub struct WrapClassifier<'a> {
    strategy: &'a WrapStrategy,
    counter: &'a mut IdCounter,
}

impl SiteClassifier for WrapClassifier<'_> {
    fn classify(&mut self, candidate: &Candidate<'_>) -> Verdict {
        match self.strategy.recognize(candidate) {
            Some(id) => {
                if let Some(id) = id {
                    self.counter.observe(id);
                }
                trace!(?id, text = candidate.text().unwrap_or_default(), "recognized wrapped site");
                Verdict::Skip(SkipReason::AlreadyWrapped { id })
            }
            None => Verdict::Schedule,
        }
    }
}
