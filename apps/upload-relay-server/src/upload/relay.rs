//! Bounded Relay
//!
//! A single-producer/single-consumer conduit between the task reading the
//! upload and the handler building the response. The channel holds at most
//! `RELAY_CAPACITY` chunks, so a stalled reader stalls the writer, which in
//! turn stops pulling from the client socket.
//!
//! Both close operations consume the writer: one close per transfer, and no
//! writes after it.

use axum::body::Bytes;
use tokio::sync::mpsc;

use super::types::{Completed, TransferError, RELAY_CAPACITY};

enum Frame {
    Chunk(Bytes),
    End(Completed),
    Fail(TransferError),
}

/// What a successful `read` observed
#[derive(Debug, PartialEq, Eq)]
pub enum Signal {
    /// Next chunk, in the order it was written
    Data(Bytes),
    /// Clean end of stream with the producer's final tally
    Eof(Completed),
}

/// The consumer hung up before the writer finished
#[derive(Debug, thiserror::Error)]
#[error("relay reader dropped")]
pub struct ReaderGone;

/// Writing half, owned by the producer
pub struct RelayWriter {
    tx: mpsc::Sender<Frame>,
}

/// Reading half, owned by the consumer
pub struct RelayReader {
    rx: mpsc::Receiver<Frame>,
}

/// Create a connected writer/reader pair
pub fn pipe() -> (RelayWriter, RelayReader) {
    let (tx, rx) = mpsc::channel(RELAY_CAPACITY);
    (RelayWriter { tx }, RelayReader { rx })
}

impl RelayWriter {
    /// Hand a chunk to the reader, waiting while the relay is full
    pub async fn write(&self, chunk: Bytes) -> Result<(), ReaderGone> {
        self.tx.send(Frame::Chunk(chunk)).await.map_err(|_| ReaderGone)
    }

    /// Signal clean end of stream
    pub async fn close_normally(self, completed: Completed) {
        self.close(Frame::End(completed)).await;
    }

    /// Signal a terminal error
    pub async fn close_with_error(self, kind: TransferError) {
        self.close(Frame::Fail(kind)).await;
    }

    async fn close(self, frame: Frame) {
        if self.tx.send(frame).await.is_err() {
            tracing::debug!("Relay reader gone before close signal");
        }
    }
}

impl RelayReader {
    /// Wait for the next chunk or the terminal signal.
    ///
    /// A writer dropped without closing reads as `Truncated`. Callers stop at
    /// the first terminal result.
    pub async fn read(&mut self) -> Result<Signal, TransferError> {
        match self.rx.recv().await {
            Some(Frame::Chunk(chunk)) => Ok(Signal::Data(chunk)),
            Some(Frame::End(completed)) => Ok(Signal::Eof(completed)),
            Some(Frame::Fail(kind)) => Err(kind),
            None => Err(TransferError::Truncated(
                "producer stopped without closing the relay".to_string(),
            )),
        }
    }
}
