//! Streaming Upload Pipeline
//!
//! A single multipart part is relayed from a producer task to the request
//! handler through a bounded channel:
//! - SHA-256 is computed incrementally as chunks arrive
//! - A running byte count enforces the size ceiling mid-stream
//! - Nothing is persisted; the consumer discards bytes after counting them
//!
//! Flow:
//! 1. The handler finds the `file` part and spawns the producer
//! 2. The producer hashes, counts and relays each chunk
//! 3. The producer closes the relay once: end of stream, oversize or truncation
//! 4. The consumer maps that close signal to the HTTP response

pub mod consumer;
pub mod digest;
pub mod guard;
pub mod producer;
pub mod relay;
pub mod types;

pub use consumer::{consume, throughput_mbps};
pub use digest::DigestAccumulator;
pub use guard::{declared_length, precheck, SizeGuard};
pub use producer::produce;
pub use relay::{pipe, RelayReader, RelayWriter, Signal};
pub use types::*;
