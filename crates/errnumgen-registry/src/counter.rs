//! Identifier counter.

use errnumgen_error::{Error, Result};

/// Monotonic identifier state for one run.
///
/// Seeded from every identifier recovered from already wrapped sites, then
/// advanced once per new site. Recovery after the first issued identifier is
/// a contract violation: numbering would depend on traversal order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdCounter {
    recovered: u32,
    current: u32,
    issued: u32,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier found on an already wrapped site.
    pub fn observe(&mut self, id: u32) {
        debug_assert_eq!(self.issued, 0, "identifier recovered after issuing");
        self.recovered = self.recovered.max(id);
        self.current = self.current.max(id);
    }

    /// Issue the next identifier. Fails once `u32::MAX` is in use.
    pub fn next_id(&mut self) -> Result<u32> {
        let Some(next) = self.current.checked_add(1) else {
            return Err(Error::config_invalid("identifier space exhausted")
                .with_operation("counter::next_id")
                .with_context("current", self.current.to_string()));
        };
        self.current = next;
        self.issued += 1;
        Ok(next)
    }

    /// Highest identifier found on already wrapped sites.
    pub fn recovered(&self) -> u32 {
        self.recovered
    }

    /// Highest identifier in use; the registry declares `1..=value`.
    pub fn value(&self) -> u32 {
        self.current
    }

    /// Identifiers issued during this run.
    pub fn issued(&self) -> u32 {
        self.issued
    }
}
