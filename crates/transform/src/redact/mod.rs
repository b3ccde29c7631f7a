//! Redaction processor - mask a target byte sequence
//!
//! Replaces every non-overlapping left-to-right occurrence of a target
//! sequence with a mask. Records without the target pass through untouched
//! (no allocation); records with it are rewritten into a fresh buffer.
//!
//! Substring replacement is deliberate: it keeps the hot path allocation-
//! and backtracking-free. Regex-based redaction belongs in a different
//! processor if it is ever needed.

use bytes::Bytes;

use crate::filter::contains;
use crate::{Disposition, ProcessContext, Processor, TransformError, TransformResult};

#[cfg(test)]
#[path = "redact_test.rs"]
mod tests;

/// Replaces occurrences of a target sequence with a mask. Never drops.
pub struct RedactProcessor {
    name: String,
    target: Bytes,
    mask: Bytes,
}

impl RedactProcessor {
    /// Create a redaction processor.
    ///
    /// # Errors
    ///
    /// Returns a config error if the target is empty: an empty target has
    /// no meaningful replacement semantics and would mask every boundary.
    pub fn new(
        name: impl Into<String>,
        target: impl Into<Bytes>,
        mask: impl Into<Bytes>,
    ) -> TransformResult<Self> {
        let target = target.into();
        if target.is_empty() {
            return Err(TransformError::config("redact target must not be empty"));
        }

        Ok(Self {
            name: name.into(),
            target,
            mask: mask.into(),
        })
    }

    fn redact(&self, record: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(record.len());
        let mut rest = record;

        while let Some(at) = find(rest, &self.target) {
            out.extend_from_slice(&rest[..at]);
            out.extend_from_slice(&self.mask);
            rest = &rest[at + self.target.len()..];
        }
        out.extend_from_slice(rest);
        out
    }
}

impl Processor for RedactProcessor {
    fn process(&self, _ctx: &ProcessContext, record: Bytes) -> TransformResult<Disposition> {
        if !contains(&record, &self.target) {
            return Ok(Disposition::Keep(record));
        }
        Ok(Disposition::Keep(Bytes::from(self.redact(&record))))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for RedactProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedactProcessor")
            .field("name", &self.name)
            .finish()
    }
}

/// Offset of the first occurrence of `needle` in `haystack`, if any
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
