//! Manifest store contract and the Redis implementation
//!
//! The store is a key/value + pub-sub pair: `fetch` reads the value key,
//! and any message on the update channel - payload ignored - means
//! "refetch the value key now".

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::ControlError;

/// Default value key holding the manifest JSON
pub const DEFAULT_VALUE_KEY: &str = "streamgate_config";

/// Default pub-sub channel carrying update signals
pub const DEFAULT_UPDATE_CHANNEL: &str = "streamgate_updates";

/// Contract for the external configuration store
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Fetch the current manifest JSON, or `None` when the key is unset
    async fn fetch(&self) -> Result<Option<String>, ControlError>;

    /// Subscribe to update signals.
    ///
    /// Each received unit means "refetch". The subscription task stops on
    /// cancellation; the receiver then yields `None`.
    async fn watch(&self, cancel: CancellationToken) -> Result<mpsc::Receiver<()>, ControlError>;
}

#[async_trait]
impl<S: ManifestStore + ?Sized> ManifestStore for std::sync::Arc<S> {
    async fn fetch(&self) -> Result<Option<String>, ControlError> {
        (**self).fetch().await
    }

    async fn watch(&self, cancel: CancellationToken) -> Result<mpsc::Receiver<()>, ControlError> {
        (**self).watch(cancel).await
    }
}

/// Store backed by a Redis-compatible server: `GET` for the value key,
/// `SUBSCRIBE` for the update channel
pub struct RedisStore {
    client: redis::Client,
    value_key: String,
    channel: String,
}

impl RedisStore {
    /// Create a store client for `host:port`.
    ///
    /// Connections are established lazily, so an unreachable server shows
    /// up on the first `fetch`/`watch`, not here.
    pub fn new(
        address: &str,
        value_key: impl Into<String>,
        channel: impl Into<String>,
    ) -> Result<Self, ControlError> {
        let client = redis::Client::open(format!("redis://{address}"))?;
        Ok(Self {
            client,
            value_key: value_key.into(),
            channel: channel.into(),
        })
    }
}

#[async_trait]
impl ManifestStore for RedisStore {
    async fn fetch(&self) -> Result<Option<String>, ControlError> {
        use redis::AsyncCommands;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(&self.value_key).await?;
        Ok(value)
    }

    async fn watch(&self, cancel: CancellationToken) -> Result<mpsc::Receiver<()>, ControlError> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(&self.channel).await?;

        let (tx, rx) = mpsc::channel(8);
        let channel = self.channel.clone();

        tokio::spawn(async move {
            let mut messages = pubsub.on_message();
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    message = messages.next() => {
                        match message {
                            // Payload is irrelevant; any message is a signal.
                            Some(_) => {
                                if tx.send(()).await.is_err() {
                                    break;
                                }
                            }
                            None => break,
                        }
                    }
                }
            }
            tracing::debug!(channel = %channel, "update subscription closed");
        });

        Ok(rx)
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("value_key", &self.value_key)
            .field("channel", &self.channel)
            .finish()
    }
}
