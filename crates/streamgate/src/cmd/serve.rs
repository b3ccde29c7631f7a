//! Serve command - run the gateway
//!
//! Wires queue → worker → sinks, starts both ingestors and the control
//! watcher, and runs until SIGINT/SIGTERM. On signal everything is
//! cancelled and the worker gets up to one second for its final flush.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use streamgate_config::Config;
use streamgate_control::{ControlWatcher, RedisStore};
use streamgate_pipeline::{PipelineWorker, WorkerConfig};
use streamgate_queue::bounded;
use streamgate_sinks::{ConsoleSink, FanoutSink, Sink};
use streamgate_sources::{TcpIngest, TcpIngestConfig, UdpIngest, UdpIngestConfig};
use streamgate_transform::ProcessorChain;

/// How long the worker gets for its final flush after cancellation
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Run the gateway until a shutdown signal arrives
pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        stream_port = config.server.stream_port,
        datagram_port = config.server.datagram_port,
        store = %config.control.address,
        queue_capacity = config.engine.queue_capacity,
        "StreamGate starting"
    );

    let cancel = CancellationToken::new();

    // Queue: many ingest tasks fan into the serialized producer handle,
    // exactly one worker consumes.
    let (producer, consumer) =
        bounded::<Bytes>(config.engine.queue_capacity).context("invalid queue capacity")?;
    let producer = producer.into_shared();

    // Worker starts with an empty chain and a console sink; the control
    // watcher installs the real configuration.
    let (worker, pipeline) = PipelineWorker::new(
        consumer,
        ProcessorChain::empty(),
        FanoutSink::single(Arc::new(ConsoleSink::new()) as Arc<dyn Sink>),
        WorkerConfig {
            batch_size: config.engine.batch_size,
            flush_interval: config.engine.flush_interval,
            bypass_threshold: config.engine.bypass_threshold,
        },
    );

    // Bind both listeners before spawning anything: a bad port is fatal.
    let tcp = TcpIngest::bind(
        TcpIngestConfig {
            address: config.server.stream_address.clone(),
            port: config.server.stream_port,
        },
        producer.clone(),
    )
    .await
    .context("failed to bind stream listener")?;

    let udp = UdpIngest::bind(
        UdpIngestConfig {
            address: config.server.datagram_address.clone(),
            port: config.server.datagram_port,
        },
        producer,
    )
    .await
    .context("failed to bind datagram listener")?;

    let store = RedisStore::new(
        &config.control.address,
        config.control.value_key.clone(),
        config.control.channel.clone(),
    )
    .context("invalid control store address")?;
    let watcher = ControlWatcher::new(store, pipeline);

    let worker_task = tokio::spawn(worker.run(cancel.clone()));
    let watcher_task = tokio::spawn(watcher.run(cancel.clone()));
    let tcp_task = tokio::spawn(tcp.run(cancel.clone()));
    let udp_task = tokio::spawn(udp.run(cancel.clone()));

    info!("StreamGate running, press Ctrl+C to stop");
    wait_for_shutdown().await;
    info!("shutdown signal received, stopping...");

    cancel.cancel();

    // The worker flushes its in-flight batch on cancellation; give it a
    // bounded window before exiting.
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, worker_task).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "pipeline worker panicked during shutdown"),
        Err(_) => warn!("pipeline worker did not finish within timeout"),
    }

    for (name, task) in [
        ("control watcher", watcher_task),
        ("stream ingestor", tcp_task),
        ("datagram ingestor", udp_task),
    ] {
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(task = name, error = %e, "task panicked during shutdown"),
            Err(_) => warn!(task = name, "task did not finish within timeout"),
        }
    }

    info!("StreamGate shutdown complete");
    Ok(())
}

/// Load the config file, falling back to defaults when none is given
fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            info!(config = %path.display(), "using config file");
            Config::from_file(&path).context("failed to load configuration")
        }
        None => {
            let default_path = PathBuf::from("configs/config.toml");
            if default_path.exists() {
                info!(config = %default_path.display(), "using config file");
                Config::from_file(&default_path).context("failed to load configuration")
            } else {
                info!("no config file found, using defaults");
                Ok(Config::default())
            }
        }
    }
}

/// Resolve once the process is told to stop: SIGINT everywhere, SIGTERM
/// additionally on unix
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect("cannot listen for SIGTERM");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
