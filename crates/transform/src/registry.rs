//! Processor registry - manifest-driven processor creation
//!
//! Maps processor type names to factories so the control plane can rebuild
//! chains from a manifest without knowing concrete processor types.
//!
//! # Design
//!
//! - **Validation at the factory**: missing or invalid params fail the
//!   `create` call; nothing half-built ever reaches a chain
//! - **Closed by default**: [`default_registry`] registers the built-in
//!   processors; the registry itself stays open for tests

use std::collections::HashMap;

use crate::attribute::{AttributeFilterConfig, AttributeFilterProcessor};
use crate::filter::FilterProcessor;
use crate::redact::RedactProcessor;
use crate::{Processor, TransformError, TransformResult};

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

/// Parameter map attached to a manifest processor rule
pub type ProcessorParams = HashMap<String, String>;

/// Factory trait for creating processors from manifest params
pub trait ProcessorFactory: Send + Sync {
    /// Build a processor instance.
    ///
    /// # Errors
    ///
    /// Returns `TransformError::Config` when required params are missing or
    /// invalid. A failing factory rejects the whole reconfiguration.
    fn create(
        &self,
        id: &str,
        params: &ProcessorParams,
    ) -> TransformResult<Box<dyn Processor>>;

    /// Type name this factory handles (matches the manifest `type` field)
    fn kind(&self) -> &'static str;
}

/// Registry of processor factories keyed by type name
pub struct ProcessorRegistry {
    factories: HashMap<String, Box<dyn ProcessorFactory>>,
}

impl ProcessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under its type name.
    ///
    /// # Panics
    ///
    /// Panics if the type name is already registered.
    pub fn register<F: ProcessorFactory + 'static>(&mut self, factory: F) {
        let kind = factory.kind();
        if self.factories.contains_key(kind) {
            panic!("processor factory '{kind}' already registered");
        }
        self.factories.insert(kind.to_string(), Box::new(factory));
    }

    /// Whether a type name is registered
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered type names
    pub fn available_kinds(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }

    /// Build a processor by type name.
    ///
    /// # Errors
    ///
    /// `TransformError::Config` for an unregistered type or a factory
    /// validation failure.
    pub fn create(
        &self,
        kind: &str,
        id: &str,
        params: &ProcessorParams,
    ) -> TransformResult<Box<dyn Processor>> {
        let factory = self.factories.get(kind).ok_or_else(|| {
            TransformError::config(format!(
                "unknown processor type '{}', available: [{}]",
                kind,
                self.available_kinds().join(", ")
            ))
        })?;
        factory.create(id, params)
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with all built-in processors registered:
/// `filter`, `redact`, `attribute_filter`
pub fn default_registry() -> ProcessorRegistry {
    let mut registry = ProcessorRegistry::new();
    registry.register(FilterFactory);
    registry.register(RedactFactory);
    registry.register(AttributeFilterFactory);
    registry
}

/// Factory for [`FilterProcessor`]
///
/// Params: `value` - substring whose presence drops the record.
#[derive(Debug, Clone, Copy)]
pub struct FilterFactory;

impl ProcessorFactory for FilterFactory {
    fn create(
        &self,
        id: &str,
        params: &ProcessorParams,
    ) -> TransformResult<Box<dyn Processor>> {
        let value = params
            .get("value")
            .ok_or_else(|| TransformError::config("filter requires a 'value' param"))?;
        Ok(Box::new(FilterProcessor::new(id, vec![value.clone()])))
    }

    fn kind(&self) -> &'static str {
        "filter"
    }
}

/// Factory for [`RedactProcessor`]
///
/// Params: `pattern` - target substring, `replacement` - mask. Both
/// required non-empty.
#[derive(Debug, Clone, Copy)]
pub struct RedactFactory;

impl ProcessorFactory for RedactFactory {
    fn create(
        &self,
        id: &str,
        params: &ProcessorParams,
    ) -> TransformResult<Box<dyn Processor>> {
        let pattern = params
            .get("pattern")
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                TransformError::config("redact requires a non-empty 'pattern' param")
            })?;
        let replacement = params
            .get("replacement")
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                TransformError::config("redact requires a non-empty 'replacement' param")
            })?;

        Ok(Box::new(RedactProcessor::new(
            id,
            pattern.clone(),
            replacement.clone(),
        )?))
    }

    fn kind(&self) -> &'static str {
        "redact"
    }
}

/// Factory for [`AttributeFilterProcessor`]
///
/// Params: `attribute` XOR `path`, optional `operator`
/// (equals | contains | regex, default equals), `value`.
#[derive(Debug, Clone, Copy)]
pub struct AttributeFilterFactory;

impl ProcessorFactory for AttributeFilterFactory {
    fn create(
        &self,
        id: &str,
        params: &ProcessorParams,
    ) -> TransformResult<Box<dyn Processor>> {
        let config = AttributeFilterConfig {
            name: id.to_string(),
            attribute: params.get("attribute").cloned(),
            path: params.get("path").cloned(),
            operator: params.get("operator").cloned().unwrap_or_default(),
            value: params.get("value").cloned().unwrap_or_default(),
        };
        Ok(Box::new(AttributeFilterProcessor::new(config)?))
    }

    fn kind(&self) -> &'static str {
        "attribute_filter"
    }
}
