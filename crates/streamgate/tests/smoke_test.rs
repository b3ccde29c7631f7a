//! Smoke tests for the StreamGate gateway
//!
//! These verify end-to-end functionality by sending records through real
//! sockets and observing what the pipeline delivers to its sink.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use streamgate_pipeline::{PipelineWorker, WorkerConfig};
use streamgate_queue::bounded;
use streamgate_sinks::{FanoutSink, Sink, SinkResult};
use streamgate_sources::{TcpIngest, TcpIngestConfig, UdpIngest, UdpIngestConfig};
use streamgate_transform::{FilterProcessor, ProcessorChain, RedactProcessor};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;

/// Sink that records every delivered record
struct CollectSink {
    records: Mutex<Vec<Bytes>>,
}

impl CollectSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
        })
    }

    fn records(&self) -> Vec<Bytes> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Sink for CollectSink {
    async fn write_batch(&self, batch: &[Bytes]) -> SinkResult<()> {
        self.records.lock().unwrap().extend_from_slice(batch);
        Ok(())
    }

    fn name(&self) -> &str {
        "collect"
    }
}

async fn wait_until(what: &str, cond: impl Fn() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !cond() {
        if tokio::time::Instant::now() > deadline {
            panic!("timed out waiting for: {what}");
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_tcp_lines_flow_through_chain_to_sink() {
    let (producer, consumer) = bounded::<Bytes>(1024).unwrap();
    let producer = producer.into_shared();

    let chain = ProcessorChain::new(vec![
        Box::new(FilterProcessor::new("filter", vec!["bad".to_string()])),
        Box::new(RedactProcessor::new("redact", "secret".to_string(), "xxxx".to_string()).unwrap()),
    ]);
    let sink = CollectSink::new();
    let (worker, _pipeline) = PipelineWorker::new(
        consumer,
        chain,
        FanoutSink::single(sink.clone()),
        WorkerConfig {
            flush_interval: Duration::from_millis(20),
            ..Default::default()
        },
    );

    let tcp = TcpIngest::bind(
        TcpIngestConfig {
            address: "127.0.0.1".into(),
            port: 0,
        },
        producer,
    )
    .await
    .unwrap();
    let addr = tcp.local_addr();

    let cancel = CancellationToken::new();
    let worker_task = tokio::spawn(worker.run(cancel.clone()));
    tokio::spawn(tcp.run(cancel.clone()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"good log\nthis has secret value\nthis is bad log\n")
        .await
        .unwrap();
    stream.flush().await.unwrap();

    wait_until("two surviving records", || sink.records().len() == 2).await;
    assert_eq!(
        sink.records(),
        vec![
            Bytes::from_static(b"good log\n"),
            Bytes::from_static(b"this has xxxx value\n"),
        ]
    );

    cancel.cancel();
    worker_task.await.unwrap();
}

#[tokio::test]
async fn test_udp_datagrams_flow_to_sink() {
    let (producer, consumer) = bounded::<Bytes>(1024).unwrap();
    let producer = producer.into_shared();

    let sink = CollectSink::new();
    let (worker, _pipeline) = PipelineWorker::new(
        consumer,
        ProcessorChain::empty(),
        FanoutSink::single(sink.clone()),
        WorkerConfig {
            flush_interval: Duration::from_millis(20),
            ..Default::default()
        },
    );

    let udp = UdpIngest::bind(
        UdpIngestConfig {
            address: "127.0.0.1".into(),
            port: 0,
        },
        producer,
    )
    .await
    .unwrap();
    let addr = udp.local_addr();

    let cancel = CancellationToken::new();
    let worker_task = tokio::spawn(worker.run(cancel.clone()));
    tokio::spawn(udp.run(cancel.clone()));

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"datagram record", addr).await.unwrap();

    wait_until("datagram delivered", || !sink.records().is_empty()).await;
    assert_eq!(sink.records(), vec![Bytes::from_static(b"datagram record")]);

    cancel.cancel();
    worker_task.await.unwrap();
}

#[tokio::test]
async fn test_both_ingestors_share_one_queue() {
    let (producer, consumer) = bounded::<Bytes>(1024).unwrap();
    let producer = producer.into_shared();

    let sink = CollectSink::new();
    let (worker, _pipeline) = PipelineWorker::new(
        consumer,
        ProcessorChain::empty(),
        FanoutSink::single(sink.clone()),
        WorkerConfig {
            flush_interval: Duration::from_millis(20),
            ..Default::default()
        },
    );

    let tcp = TcpIngest::bind(
        TcpIngestConfig {
            address: "127.0.0.1".into(),
            port: 0,
        },
        producer.clone(),
    )
    .await
    .unwrap();
    let udp = UdpIngest::bind(
        UdpIngestConfig {
            address: "127.0.0.1".into(),
            port: 0,
        },
        producer,
    )
    .await
    .unwrap();
    let tcp_addr = tcp.local_addr();
    let udp_addr = udp.local_addr();

    let cancel = CancellationToken::new();
    let worker_task = tokio::spawn(worker.run(cancel.clone()));
    tokio::spawn(tcp.run(cancel.clone()));
    tokio::spawn(udp.run(cancel.clone()));

    let mut stream = TcpStream::connect(tcp_addr).await.unwrap();
    stream.write_all(b"over tcp\n").await.unwrap();
    stream.flush().await.unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    sender.send_to(b"over udp", udp_addr).await.unwrap();

    wait_until("both records delivered", || sink.records().len() == 2).await;

    let mut records = sink.records();
    records.sort();
    assert_eq!(
        records,
        vec![Bytes::from_static(b"over tcp\n"), Bytes::from_static(b"over udp")]
    );

    cancel.cancel();
    worker_task.await.unwrap();
}
