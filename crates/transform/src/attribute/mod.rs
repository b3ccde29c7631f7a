//! Attribute filter processor - drop records by JSON attribute value
//!
//! Parses each record as JSON and compares one resolved value against a
//! configured comparand. Two addressing modes, exactly one of which must be
//! set at construction:
//!
//! - **Attribute**: a well-known telemetry attribute name
//!   (`service.name`, `http.status_code`, ...). The processor searches a
//!   prioritized list of known locations, then generic fallbacks.
//! - **Path**: an explicit `/`-separated path used verbatim
//!   (`metadata/labels/app.name`).
//!
//! # Fail-open
//!
//! Records that are not valid JSON pass through, as do records where the
//! attribute does not resolve. A shaping filter must never turn malformed
//! input into silent loss.
//!
//! # Operators
//!
//! | Operator | Matches when |
//! |----------|--------------|
//! | `equals` | canonical string form equals the comparand exactly |
//! | `contains` | canonical string form contains the comparand |
//! | `regex` | the pre-compiled pattern matches the entire canonical string form |
//!
//! A match drops the record.

mod paths;

pub use paths::convert_user_path;

use bytes::Bytes;
use regex::Regex;
use serde_json::Value;

use crate::{Disposition, ProcessContext, Processor, TransformError, TransformResult};
use paths::{canonical_string, generic_paths, lookup, parse_path, well_known_paths};

#[cfg(test)]
#[path = "attribute_test.rs"]
mod tests;

/// Configuration for building an [`AttributeFilterProcessor`]
#[derive(Debug, Clone, Default)]
pub struct AttributeFilterConfig {
    /// Processor instance name (for logging)
    pub name: String,

    /// Well-known attribute name; triggers prioritized path search
    pub attribute: Option<String>,

    /// Explicit user path (`/`-separated); used verbatim
    pub path: Option<String>,

    /// Comparison operator: `equals` (default when empty), `contains`,
    /// or `regex`
    pub operator: String,

    /// Comparand (regex pattern when operator is `regex`)
    pub value: String,
}

/// Compiled comparison, validated at construction
pub enum Comparison {
    /// Exact string equality
    Equals(String),
    /// Substring containment
    Contains(String),
    /// Pre-compiled regular expression match
    Regex(Regex),
}

impl Comparison {
    fn matches(&self, text: &str) -> bool {
        match self {
            Comparison::Equals(want) => text == want,
            Comparison::Contains(want) => text.contains(want.as_str()),
            // Full match: the pattern must span the entire string form, so
            // `error` does not drop an `error_rate` attribute.
            Comparison::Regex(re) => re
                .find(text)
                .is_some_and(|m| m.start() == 0 && m.end() == text.len()),
        }
    }
}

impl std::fmt::Debug for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Comparison::Equals(v) => f.debug_tuple("Equals").field(v).finish(),
            Comparison::Contains(v) => f.debug_tuple("Contains").field(v).finish(),
            Comparison::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
        }
    }
}

/// Drops records whose resolved JSON attribute matches the comparison
pub struct AttributeFilterProcessor {
    name: String,
    /// Candidate paths, pre-parsed at construction; first hit wins
    candidates: Vec<Vec<String>>,
    comparison: Comparison,
}

impl AttributeFilterProcessor {
    /// Build the processor, validating the configuration.
    ///
    /// # Errors
    ///
    /// - both or neither of `attribute` / `path` set
    /// - unknown operator
    /// - regex pattern that fails to compile
    pub fn new(config: AttributeFilterConfig) -> TransformResult<Self> {
        let attribute = config.attribute.filter(|a| !a.is_empty());
        let path = config.path.filter(|p| !p.is_empty());

        let candidates = match (&attribute, &path) {
            (Some(_), Some(_)) => {
                return Err(TransformError::config(
                    "cannot specify both attribute and path",
                ));
            }
            (None, None) => {
                return Err(TransformError::config(
                    "either attribute or path must be specified",
                ));
            }
            (None, Some(user_path)) => {
                vec![parse_path(&convert_user_path(user_path))]
            }
            (Some(attr), None) => {
                let mut candidates = Vec::new();
                if let Some(known) = well_known_paths(attr) {
                    candidates.extend(known.iter().map(|p| parse_path(p)));
                }
                candidates.extend(generic_paths(attr).iter().map(|p| parse_path(p)));
                candidates
            }
        };

        let comparison = match config.operator.as_str() {
            "" | "equals" => Comparison::Equals(config.value),
            "contains" => Comparison::Contains(config.value),
            "regex" => {
                let re = Regex::new(&config.value).map_err(|e| {
                    TransformError::config(format!("invalid regex pattern: {e}"))
                })?;
                Comparison::Regex(re)
            }
            other => {
                return Err(TransformError::config(format!(
                    "unknown operator '{other}', expected equals, contains, or regex"
                )));
            }
        };

        Ok(Self {
            name: config.name,
            candidates,
            comparison,
        })
    }

    /// Resolve the first candidate path that exists in the record
    fn resolve<'a>(&self, json: &'a Value) -> Option<&'a Value> {
        self.candidates
            .iter()
            .find_map(|segments| lookup(json, segments))
    }
}

impl Processor for AttributeFilterProcessor {
    fn process(&self, _ctx: &ProcessContext, record: Bytes) -> TransformResult<Disposition> {
        // Fail-open: malformed records pass through.
        let Ok(json) = serde_json::from_slice::<Value>(&record) else {
            return Ok(Disposition::Keep(record));
        };

        // Fail-open: unresolved attributes pass through.
        let Some(resolved) = self.resolve(&json) else {
            return Ok(Disposition::Keep(record));
        };

        if self.comparison.matches(&canonical_string(resolved)) {
            return Ok(Disposition::Drop);
        }
        Ok(Disposition::Keep(record))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for AttributeFilterProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeFilterProcessor")
            .field("name", &self.name)
            .field("candidates", &self.candidates.len())
            .field("comparison", &self.comparison)
            .finish()
    }
}
