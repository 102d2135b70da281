//! Stream Consumer / Response Builder
//!
//! Drains the relay and turns its terminal signal into either an
//! `UploadReceipt` or the error that picks the HTTP status.

use std::time::{Duration, Instant};

use super::relay::{RelayReader, Signal};
use super::types::{UploadError, UploadReceipt};

/// Elapsed times below this are treated as this much, keeping throughput finite
pub const MIN_ELAPSED: Duration = Duration::from_micros(1);

const BITS_PER_MEGABIT: f64 = 1024.0 * 1024.0;

/// Megabits per second for `bytes` moved in `elapsed`
pub fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.max(MIN_ELAPSED).as_secs_f64();
    (bytes as f64 * 8.0 / BITS_PER_MEGABIT) / secs
}

/// Read the relay until its terminal signal. Payload bytes are discarded.
pub async fn consume(mut reader: RelayReader, started: Instant) -> Result<UploadReceipt, UploadError> {
    let mut drained: u64 = 0;

    loop {
        match reader.read().await? {
            Signal::Data(chunk) => drained += chunk.len() as u64,
            Signal::Eof(completed) => {
                let elapsed = started.elapsed();
                tracing::trace!(drained, "Relay drained");
                return Ok(UploadReceipt {
                    size: completed.size,
                    sha256: completed.sha256,
                    mbps: throughput_mbps(completed.size, elapsed),
                });
            }
        }
    }
}
