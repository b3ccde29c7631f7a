//! UDP ingest adapter - one record per datagram
//!
//! Reads packets into a reusable buffer and copies each payload into its
//! own allocation before pushing: the queue owns its records, and the read
//! buffer is overwritten on the next iteration. Read errors are logged and
//! the listener continues.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use streamgate_queue::SharedProducer;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::IngestError;
use crate::common::IngestMetrics;

#[cfg(test)]
#[path = "udp_test.rs"]
mod tests;

/// Largest possible UDP payload
const MAX_DATAGRAM_SIZE: usize = 65535;

/// UDP ingest configuration
#[derive(Debug, Clone)]
pub struct UdpIngestConfig {
    /// Bind address (e.g. "0.0.0.0")
    pub address: String,

    /// Listen port
    pub port: u16,
}

impl UdpIngestConfig {
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

impl Default for UdpIngestConfig {
    fn default() -> Self {
        Self::with_port(8082)
    }
}

/// Datagram ingest adapter: one record per packet
pub struct UdpIngest {
    socket: UdpSocket,
    local_addr: SocketAddr,
    producer: SharedProducer<Bytes>,
    metrics: Arc<IngestMetrics>,
}

impl UdpIngest {
    /// Bind the socket.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Bind`] if the address cannot be bound; the
    /// caller treats this as fatal.
    pub async fn bind(
        config: UdpIngestConfig,
        producer: SharedProducer<Bytes>,
    ) -> Result<Self, IngestError> {
        let address = config.bind_address();
        let socket = UdpSocket::bind(&address)
            .await
            .map_err(|source| IngestError::Bind { address, source })?;
        let local_addr = socket.local_addr()?;

        Ok(Self {
            socket,
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

    /// Receive datagrams until cancellation
    pub async fn run(self, cancel: CancellationToken) {
        info!(address = %self.local_addr, "datagram ingestor listening");

        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,

                received = self.socket.recv_from(&mut buf) => {
                    match received {
                        Ok((len, _peer)) => {
                            self.metrics.record_received(len as u64);
                            // Copy out: `buf` is reused on the next read.
                            let record = Bytes::copy_from_slice(&buf[..len]);
                            let _ = self.producer.push(record);
                        }
                        Err(e) => {
                            warn!(error = %e, "datagram read failed");
                            self.metrics.error();
                        }
                    }
                }
            }
        }

        info!(address = %self.local_addr, "datagram ingestor stopped");
    }
}

impl std::fmt::Debug for UdpIngest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpIngest")
            .field("local_addr", &self.local_addr)
            .finish()
    }
}
