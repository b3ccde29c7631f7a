//! StreamGate - Control
//!
//! The control plane adapter: fetches a JSON manifest from an external
//! key/value + pub-sub store and turns it into live pipeline
//! reconfiguration.
//!
//! # Overview
//!
//! The store holds the manifest under a value key; any message on the
//! update channel means "refetch". On startup and on every signal the
//! [`ControlWatcher`] fetches the manifest, rebuilds the processor chain
//! and sink set, and publishes them to the pipeline in order: chain, then
//! sink, then batch size.
//!
//! # Failure policy
//!
//! Reconfiguration is all-or-nothing: a fetch error, a parse error, or any
//! processor/output that fails to *build* rejects the whole attempt and the
//! current configuration stays installed. Unknown processor and output
//! *types* are skipped with a log line.
//!
//! The concrete store lives behind the [`ManifestStore`] trait; production
//! uses [`RedisStore`], tests use in-memory implementations.

mod error;
mod manifest;
mod store;
mod watcher;

pub use error::ControlError;
pub use manifest::{Manifest, OutputRule, PipelineManifest, ProcessorRule};
pub use store::{DEFAULT_UPDATE_CHANNEL, DEFAULT_VALUE_KEY, ManifestStore, RedisStore};
pub use watcher::ControlWatcher;
