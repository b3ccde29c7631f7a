//! Control watcher - manifest-driven live reconfiguration
//!
//! Fetches the manifest on startup and on every update signal, rebuilds
//! the processor chain and sink set, and publishes them through the
//! pipeline handle in order: chain, sink, batch size. Anything that fails
//! along the way leaves the current configuration installed.

use std::sync::Arc;

use streamgate_pipeline::PipelineHandle;
use streamgate_sinks::{ConsoleSink, FanoutSink, HttpSink, HttpSinkConfig, Sink};
use streamgate_transform::{Processor, ProcessorChain, ProcessorRegistry, default_registry};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::manifest::{Manifest, OutputRule, PipelineManifest, ProcessorRule};
use crate::store::ManifestStore;
use crate::ControlError;

#[cfg(test)]
#[path = "watcher_test.rs"]
mod tests;

/// Watches the manifest store and reconfigures the pipeline
pub struct ControlWatcher<S> {
    store: S,
    pipeline: PipelineHandle,
    registry: ProcessorRegistry,
}

impl<S: ManifestStore> ControlWatcher<S> {
    /// Create a watcher over the given store and pipeline
    pub fn new(store: S, pipeline: PipelineHandle) -> Self {
        Self {
            store,
            pipeline,
            registry: default_registry(),
        }
    }

    /// Run until cancellation: initial load, then reload per update signal
    pub async fn run(self, cancel: CancellationToken) {
        info!("control watcher starting");

        self.reload(&cancel).await;

        let mut updates = match self.store.watch(cancel.clone()).await {
            Ok(rx) => rx,
            Err(e) => {
                error!(error = %e, "update subscription failed, live reconfiguration disabled");
                cancel.cancelled().await;
                return;
            }
        };

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                signal = updates.recv() => {
                    match signal {
                        Some(()) => {
                            debug!("update signal received");
                            self.reload(&cancel).await;
                        }
                        None => break,
                    }
                }
            }
        }

        info!("control watcher stopped");
    }

    /// Fetch and apply the current manifest, keeping state on any failure
    async fn reload(&self, cancel: &CancellationToken) {
        let raw = match self.store.fetch().await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("no manifest in store, keeping current configuration");
                return;
            }
            Err(e) => {
                warn!(error = %e, "manifest fetch failed, keeping current configuration");
                return;
            }
        };

        let manifest = match Manifest::parse(&raw) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(error = %e, "manifest parse failed, keeping current configuration");
                return;
            }
        };

        let Some(pipeline_manifest) = manifest.pipelines.first() else {
            info!("manifest has no pipelines, keeping current configuration");
            return;
        };

        match self.apply(pipeline_manifest, cancel) {
            Ok(()) => {
                info!(
                    version = %manifest.version,
                    pipeline = %pipeline_manifest.name,
                    "manifest applied"
                );
            }
            Err(e) => {
                warn!(error = %e, "reconfiguration rejected, keeping current configuration");
            }
        }
    }

    /// Build everything first, then publish. All-or-nothing: a processor or
    /// output that fails to build rejects the whole manifest.
    fn apply(
        &self,
        manifest: &PipelineManifest,
        cancel: &CancellationToken,
    ) -> Result<(), ControlError> {
        let chain = self.build_chain(&manifest.processors)?;
        let sink = build_sinks(&manifest.outputs, cancel)?;

        info!(
            processors = ?chain.names(),
            sinks = ?sink.names(),
            batch_size = manifest.effective_batch_size(),
            "installing configuration"
        );

        // Publication order is part of the contract: chain, sink, batch
        // size. Each cell transitions sharply; there is no cross-cell
        // atomicity.
        self.pipeline.update_chain(chain);
        self.pipeline.update_sink(sink);
        self.pipeline.update_batch_size(manifest.effective_batch_size());
        Ok(())
    }

    fn build_chain(&self, rules: &[ProcessorRule]) -> Result<ProcessorChain, ControlError> {
        let mut processors: Vec<Box<dyn Processor>> = Vec::with_capacity(rules.len());

        for rule in rules {
            if !self.registry.contains(&rule.kind) {
                warn!(kind = %rule.kind, id = %rule.id, "unknown processor type, skipping");
                continue;
            }

            let processor = self
                .registry
                .create(&rule.kind, &rule.id, &rule.params)
                .map_err(|source| ControlError::ProcessorBuild {
                    id: rule.id.clone(),
                    source,
                })?;
            processors.push(processor);
        }

        Ok(ProcessorChain::new(processors))
    }
}

impl<S> std::fmt::Debug for ControlWatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlWatcher").finish_non_exhaustive()
    }
}

/// Build the fan-out for the manifest's outputs. Unknown output types are
/// skipped with a log line; an empty result installs a console sink.
fn build_sinks(
    outputs: &[OutputRule],
    cancel: &CancellationToken,
) -> Result<FanoutSink, ControlError> {
    let mut sinks: Vec<Arc<dyn Sink>> = Vec::new();

    for output in outputs {
        match output.kind.as_str() {
            "console" => sinks.push(Arc::new(ConsoleSink::new())),
            "http" => {
                if output.url.is_empty() {
                    warn!("http output without url, skipping");
                    continue;
                }
                let config = HttpSinkConfig::new(output.url.clone())
                    .with_headers(output.headers.clone());
                let sink = HttpSink::new(config)
                    .map_err(|source| ControlError::SinkBuild { source })?
                    .with_cancellation(cancel.clone());
                sinks.push(Arc::new(sink));
            }
            other => {
                warn!(kind = %other, "unknown output type, skipping");
            }
        }
    }

    if sinks.is_empty() {
        sinks.push(Arc::new(ConsoleSink::new()));
    }

    Ok(FanoutSink::new(sinks))
}
