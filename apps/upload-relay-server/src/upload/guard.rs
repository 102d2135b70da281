//! Size Guard
//!
//! Two checks share the same ceiling:
//! - `precheck` rejects on the declared Content-Length before any body is read.
//!   The header is client-controlled, so this only saves work.
//! - `admit` counts every streamed byte and is the check that actually holds.

use axum::http::{header, HeaderMap};

use super::types::{TransferError, UploadError, UploadLimits};

/// Running byte counter for one upload
#[derive(Debug, Clone)]
pub struct SizeGuard {
    limits: UploadLimits,
    total: u64,
}

impl SizeGuard {
    pub fn new(limits: UploadLimits) -> Self {
        Self { limits, total: 0 }
    }

    /// Bytes counted so far
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Add `n` bytes to the running total, then compare it against the ceiling.
    ///
    /// Returns the new total, or `Oversize` once the total is past the ceiling.
    pub fn admit(&mut self, n: usize) -> Result<u64, TransferError> {
        self.total = self.total.saturating_add(n as u64);
        if self.total > self.limits.max_bytes {
            return Err(TransferError::Oversize {
                limit: self.limits.max_bytes,
            });
        }
        Ok(self.total)
    }
}

/// Parse the Content-Length header, ignoring it when absent or unparseable
pub fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
}

/// Reject a request whose declared length cannot possibly fit
pub fn precheck(declared: Option<u64>, limits: UploadLimits) -> Result<(), UploadError> {
    match declared {
        Some(declared) if declared > limits.max_bytes.saturating_add(limits.header_slack) => {
            Err(UploadError::TooLarge {
                declared,
                limit: limits.max_bytes,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limits(max_bytes: u64) -> UploadLimits {
        UploadLimits {
            max_bytes,
            header_slack: 16,
        }
    }

    #[test]
    fn test_admit_up_to_ceiling() {
        let mut guard = SizeGuard::new(limits(10));
        assert_eq!(guard.admit(4).unwrap(), 4);
        assert_eq!(guard.admit(6).unwrap(), 10);
        assert_eq!(guard.total(), 10);
    }

    #[test]
    fn test_admit_counts_before_tripping() {
        let mut guard = SizeGuard::new(limits(10));
        guard.admit(8).unwrap();
        let err = guard.admit(3).unwrap_err();
        assert_eq!(err, TransferError::Oversize { limit: 10 });
        // The chunk that tripped the guard is still counted
        assert_eq!(guard.total(), 11);
    }

    #[test]
    fn test_precheck_allows_slack() {
        assert!(precheck(None, limits(10)).is_ok());
        assert!(precheck(Some(26), limits(10)).is_ok());
        assert!(matches!(
            precheck(Some(27), limits(10)),
            Err(UploadError::TooLarge { declared: 27, limit: 10 })
        ));
    }

    #[test]
    fn test_declared_length_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("1234"));
        assert_eq!(declared_length(&headers), Some(1234));

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("-5"));
        assert_eq!(declared_length(&headers), None);

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert_eq!(declared_length(&headers), None);
    }
}
