//! Stream Producer
//!
//! Reads the upload part chunk by chunk, hashing and counting each chunk,
//! and relays it to the consumer. The running total, digest and outcome all
//! live inside this task; the consumer only sees them through the relay's
//! close signal.

use std::fmt::Display;

use axum::body::Bytes;
use futures::{Stream, StreamExt};

use super::digest::DigestAccumulator;
use super::guard::SizeGuard;
use super::relay::RelayWriter;
use super::types::{Completed, TransferError};

/// Drive `source` to a terminal state, closing `relay` exactly once.
///
/// - clean end of `source`: `close_normally` with size and digest
/// - running total past the ceiling: `close_with_error(Oversize)`, without
///   relaying the chunk that crossed it
/// - any read error: `close_with_error(Truncated)`
pub async fn produce<S, E>(source: S, mut guard: SizeGuard, relay: RelayWriter)
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    let mut source = std::pin::pin!(source);
    let mut digest = DigestAccumulator::new();

    loop {
        match source.next().await {
            Some(Ok(chunk)) => {
                if chunk.is_empty() {
                    continue;
                }

                let admitted = guard.admit(chunk.len());
                digest.update(&chunk);

                if let Err(oversize) = admitted {
                    tracing::debug!(total = guard.total(), "Upload crossed size ceiling");
                    relay.close_with_error(oversize).await;
                    return;
                }

                if relay.write(chunk).await.is_err() {
                    tracing::debug!(total = guard.total(), "Consumer gone, stopping producer");
                    return;
                }
            }
            Some(Err(e)) => {
                tracing::warn!(total = guard.total(), "Upload stream failed: {}", e);
                relay
                    .close_with_error(TransferError::Truncated(e.to_string()))
                    .await;
                return;
            }
            None => {
                let completed = Completed {
                    size: guard.total(),
                    sha256: digest.finalize(),
                };
                relay.close_normally(completed).await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::digest::compute_hash;
    use crate::upload::relay::{pipe, RelayReader, Signal};
    use crate::upload::types::UploadLimits;
    use futures::stream;
    use std::io;

    fn guard(max_bytes: u64) -> SizeGuard {
        SizeGuard::new(UploadLimits {
            max_bytes,
            header_slack: 0,
        })
    }

    /// Drain the reader, returning the relayed bytes and the terminal result
    async fn drain(mut reader: RelayReader) -> (Vec<u8>, Result<Completed, TransferError>) {
        let mut seen = Vec::new();
        loop {
            match reader.read().await {
                Ok(Signal::Data(chunk)) => seen.extend_from_slice(&chunk),
                Ok(Signal::Eof(completed)) => return (seen, Ok(completed)),
                Err(e) => return (seen, Err(e)),
            }
        }
    }

    fn chunks(parts: &[&'static str]) -> Vec<Result<Bytes, io::Error>> {
        parts.iter().map(|p| Ok(Bytes::from_static(p.as_bytes()))).collect()
    }

    #[tokio::test]
    async fn test_clean_stream_completes() {
        let (writer, reader) = pipe();
        let source = stream::iter(chunks(&["Hello, ", "", "World!"]));
        tokio::spawn(produce(source, guard(1024), writer));

        let (seen, outcome) = drain(reader).await;
        assert_eq!(seen, b"Hello, World!");
        assert_eq!(
            outcome.unwrap(),
            Completed {
                size: 13,
                sha256: compute_hash(b"Hello, World!"),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_stream_completes() {
        let (writer, reader) = pipe();
        let source = stream::iter(Vec::<Result<Bytes, io::Error>>::new());
        tokio::spawn(produce(source, guard(1024), writer));

        let (seen, outcome) = drain(reader).await;
        assert!(seen.is_empty());
        let completed = outcome.unwrap();
        assert_eq!(completed.size, 0);
        assert_eq!(completed.sha256, compute_hash(b""));
    }

    #[tokio::test]
    async fn test_exact_ceiling_completes() {
        let (writer, reader) = pipe();
        let source = stream::iter(chunks(&["12345", "67890"]));
        tokio::spawn(produce(source, guard(10), writer));

        let (_, outcome) = drain(reader).await;
        assert_eq!(outcome.unwrap().size, 10);
    }

    #[tokio::test]
    async fn test_oversize_chunk_is_not_relayed() {
        let (writer, reader) = pipe();
        let source = stream::iter(chunks(&["12345", "678901", "never read"]));
        tokio::spawn(produce(source, guard(10), writer));

        let (seen, outcome) = drain(reader).await;
        assert_eq!(seen, b"12345");
        assert_eq!(outcome.unwrap_err(), TransferError::Oversize { limit: 10 });
    }

    #[tokio::test]
    async fn test_read_error_truncates() {
        let (writer, reader) = pipe();
        let source = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
        ]);
        tokio::spawn(produce(source, guard(1024), writer));

        let (seen, outcome) = drain(reader).await;
        assert_eq!(seen, b"partial");
        match outcome {
            Err(TransferError::Truncated(reason)) => assert!(reason.contains("client went away")),
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_producer_stops_when_consumer_leaves() {
        let (writer, reader) = pipe();
        drop(reader);
        let source = stream::iter(chunks(&["a", "b", "c"]));

        // Must return rather than hang on a relay nobody reads
        tokio::time::timeout(
            std::time::Duration::from_secs(1),
            produce(source, guard(1024), writer),
        )
        .await
        .unwrap();
    }
}
