//! TCP ingest adapter - newline-framed stream source
//!
//! Accepts connections and spawns one handler task per connection. Each
//! handler reads newline-terminated records and pushes them into the queue;
//! the terminator is retained in the record. A read error closes that
//! connection only; the listener keeps accepting.
//!
//! # Design
//!
//! - **Bind/run split**: [`TcpIngest::bind`] fails fast so a bad port is a
//!   startup error, not a background log line
//! - **Owned records**: every line is moved into its own allocation before
//!   the push; nothing aliases the read buffer
//! - **Silent shedding**: queue-full pushes are swallowed; the queue counts
//!   them

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use streamgate_queue::SharedProducer;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::IngestError;
use crate::common::IngestMetrics;

#[cfg(test)]
#[path = "tcp_test.rs"]
mod tests;

/// TCP ingest configuration
#[derive(Debug, Clone)]
pub struct TcpIngestConfig {
    /// Bind address (e.g. "0.0.0.0")
    pub address: String,

    /// Listen port
    pub port: u16,
}

impl TcpIngestConfig {
    /// Create config for the given port on all interfaces
    pub fn with_port(port: u16) -> Self {
        Self {
            address: "0.0.0.0".into(),
            port,
        }
    }

    /// The socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for TcpIngestConfig {
    fn default() -> Self {
        Self::with_port(8081)
    }
}

/// Stream ingest adapter: one record per newline-terminated line
pub struct TcpIngest {
    listener: TcpListener,
    local_addr: SocketAddr,
    producer: SharedProducer<Bytes>,
    metrics: Arc<IngestMetrics>,
}

impl TcpIngest {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Bind`] if the address cannot be bound; the
    /// caller treats this as fatal.
    pub async fn bind(
        config: TcpIngestConfig,
        producer: SharedProducer<Bytes>,
    ) -> Result<Self, IngestError> {
        let address = config.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| IngestError::Bind { address, source })?;
        let local_addr = listener.local_addr()?;

        Ok(Self {
            listener,
            local_addr,
            producer,
            metrics: Arc::new(IngestMetrics::new()),
        })
    }

    /// The address actually bound (useful with port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get a metrics handle that stays valid after `run()` consumes the
    /// adapter
    pub fn metrics(&self) -> Arc<IngestMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Accept connections until cancellation
    pub async fn run(self, cancel: CancellationToken) {
        info!(address = %self.local_addr, "stream ingestor listening");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            debug!(peer = %peer, "connection accepted");
                            self.metrics.connection_opened();

                            let producer = self.producer.clone();
                            let metrics = Arc::clone(&self.metrics);
                            let cancel = cancel.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, peer, producer, &metrics, cancel).await;
                                metrics.connection_closed();
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            self.metrics.error();
                        }
                    }
                }
            }
        }

        info!(address = %self.local_addr, "stream ingestor stopped");
    }
}

impl std::fmt::Debug for TcpIngest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpIngest")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

/// Read newline-framed records off one connection until EOF, error, or
/// cancellation
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    producer: SharedProducer<Bytes>,
    metrics: &IngestMetrics,
    cancel: CancellationToken,
) {
    let mut reader = BufReader::new(stream);

    loop {
        let mut line = Vec::new();
        let read = tokio::select! {
            _ = cancel.cancelled() => return,
            read = reader.read_until(b'\n', &mut line) => read,
        };

        match read {
            Ok(0) => {
                debug!(peer = %peer, "connection closed");
                return;
            }
            Ok(n) => {
                // read_until only returns data without a terminator at EOF;
                // a partial trailing line is not a complete record.
                if line.last() != Some(&b'\n') {
                    debug!(peer = %peer, "discarding partial trailing line");
                    return;
                }
                metrics.record_received(n as u64);
                // The line buffer is owned and fresh per record; the queue
                // takes it as-is, terminator included.
                let _ = producer.push(Bytes::from(line));
            }
            Err(e) => {
                warn!(peer = %peer, error = %e, "read failed, closing connection");
                metrics.error();
                return;
            }
        }
    }
}
