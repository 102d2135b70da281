//! Incremental SHA-256 over the relayed bytes

use sha2::{Digest, Sha256};

/// Running SHA-256 state for one upload.
///
/// `finalize` takes `self`, so a digest can only be produced once.
#[derive(Clone, Default)]
pub struct DigestAccumulator {
    hasher: Sha256,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk, in relay order
    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    /// Consume the state and return the hex-encoded digest
    pub fn finalize(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

/// Hex-encoded SHA-256 of a complete buffer
#[cfg(test)]
pub(crate) fn compute_hash(data: &[u8]) -> String {
    let mut acc = DigestAccumulator::new();
    acc.update(data);
    acc.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_digest() {
        assert_eq!(
            DigestAccumulator::new().finalize(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_chunked_matches_whole() {
        let data = b"Hello, World!";
        let mut acc = DigestAccumulator::new();
        for chunk in data.chunks(3) {
            acc.update(chunk);
        }
        let hash = acc.finalize();
        assert_eq!(hash.len(), 64); // SHA-256 = 32 bytes = 64 hex chars
        assert_eq!(hash, compute_hash(data));
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(
            compute_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
