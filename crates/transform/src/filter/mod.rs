//! Filter processor - drop records containing blocked substrings
//!
//! # Job To Be Done
//!
//! Shed known-noise records at the edge before they cost batching and
//! delivery. A record is dropped iff it contains any of the configured byte
//! sequences; the record itself is never modified.
//!
//! The search is a naive substring scan per pattern. That is O(N·M) but the
//! block lists seen in practice are short; an Aho-Corasick automaton would
//! be a drop-in replacement with identical semantics if they grow.

use bytes::Bytes;

use crate::{Disposition, ProcessContext, Processor, TransformResult};

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;

/// Drops records that contain any blocked byte sequence
pub struct FilterProcessor {
    name: String,
    blocked: Vec<Bytes>,
}

impl FilterProcessor {
    /// Create a filter with the given block list.
    ///
    /// An empty block list passes every record through.
    pub fn new(name: impl Into<String>, blocked: Vec<impl Into<Bytes>>) -> Self {
        Self {
            name: name.into(),
            blocked: blocked.into_iter().map(Into::into).collect(),
        }
    }

    fn is_blocked(&self, record: &[u8]) -> bool {
        self.blocked.iter().any(|needle| contains(record, needle))
    }
}

impl Processor for FilterProcessor {
    fn process(&self, _ctx: &ProcessContext, record: Bytes) -> TransformResult<Disposition> {
        if self.is_blocked(&record) {
            return Ok(Disposition::Drop);
        }
        Ok(Disposition::Keep(record))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for FilterProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterProcessor")
            .field("name", &self.name)
            .field("patterns", &self.blocked.len())
            .finish()
    }
}

/// Naive substring containment. An empty needle matches everything.
pub(crate) fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
