//! UDP ingest adapter tests

use std::time::Duration;

use super::*;
use streamgate_queue::{Consumer, bounded};
use tokio::net::UdpSocket;

fn local_config() -> UdpIngestConfig {
    UdpIngestConfig {
        address: "127.0.0.1".into(),
        port: 0,
    }
}

async fn start_ingestor() -> (SocketAddr, Consumer<Bytes>, CancellationToken) {
    let (tx, rx) = bounded::<Bytes>(1024).unwrap();
    let ingest = UdpIngest::bind(local_config(), tx.into_shared())
        .await
        .unwrap();
    let addr = ingest.local_addr();

    let cancel = CancellationToken::new();
    tokio::spawn(ingest.run(cancel.clone()));

    (addr, rx, cancel)
}

async fn pop_one(rx: &mut Consumer<Bytes>) -> Bytes {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(record) = rx.pop() {
            return record;
        }
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for a record");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[test]
fn test_config_defaults() {
    let config = UdpIngestConfig::default();
    assert_eq!(config.address, "0.0.0.0");
    assert_eq!(config.port, 8082);
    assert_eq!(config.bind_address(), "0.0.0.0:8082");
}

#[tokio::test]
async fn test_each_packet_is_one_record() {
    let (addr, mut rx, cancel) = start_ingestor().await;

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"packet one", addr).await.unwrap();
    sender.send_to(b"packet two", addr).await.unwrap();

    assert_eq!(pop_one(&mut rx).await, Bytes::from_static(b"packet one"));
    assert_eq!(pop_one(&mut rx).await, Bytes::from_static(b"packet two"));

    cancel.cancel();
}

#[tokio::test]
async fn test_records_are_owned_copies() {
    let (addr, mut rx, cancel) = start_ingestor().await;

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"first payload", addr).await.unwrap();
    let first = pop_one(&mut rx).await;

    // A later, different-size packet must not disturb the earlier record.
    sender.send_to(b"x", addr).await.unwrap();
    let second = pop_one(&mut rx).await;

    assert_eq!(first, Bytes::from_static(b"first payload"));
    assert_eq!(second, Bytes::from_static(b"x"));

    cancel.cancel();
}

#[tokio::test]
async fn test_empty_datagram_is_a_record() {
    let (addr, mut rx, cancel) = start_ingestor().await;

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"", addr).await.unwrap();

    assert_eq!(pop_one(&mut rx).await, Bytes::new());

    cancel.cancel();
}

#[tokio::test]
async fn test_queue_full_is_swallowed() {
    let (tx, mut rx) = bounded::<Bytes>(2).unwrap();
    let ingest = UdpIngest::bind(local_config(), tx.into_shared())
        .await
        .unwrap();
    let addr = ingest.local_addr();
    let metrics = ingest.metrics();

    let cancel = CancellationToken::new();
    tokio::spawn(ingest.run(cancel.clone()));

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    for i in 0..5u8 {
        sender.send_to(&[b'0' + i], addr).await.unwrap();
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while metrics.snapshot().records_received < 5 {
        if tokio::time::Instant::now() > deadline {
            // UDP is lossy even on loopback; accept what arrived.
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // Whatever arrived beyond capacity was shed at the queue, silently.
    let mut delivered = 0;
    while rx.pop().is_some() {
        delivered += 1;
    }
    assert!(delivered <= 2);

    cancel.cancel();
}
