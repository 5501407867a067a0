//! Error types for the W3G replay decoder.
//!
//! Only two kinds of failure ever reach a caller of the public parse
//! functions: [`ReplayError::Format`] (the input is not a replay) and
//! [`ReplayError::CorruptBlock`] (a compressed block cannot be recovered).
//! [`ReplayError::TruncatedRecord`] is produced by the low-level readers and
//! the action decoder; the block walker recovers from it locally by keeping
//! the events decoded so far.

use thiserror::Error;

/// The main error type for W3G replay decoding.
///
/// # Example
///
/// ```
/// use w3g_replay::error::{ReplayError, Result};
///
/// fn example_operation() -> Result<()> {
///     Err(ReplayError::Format {
///         reason: "not a replay file".to_string(),
///     })
/// }
/// assert!(example_operation().is_err());
/// ```
#[derive(Error, Debug)]
pub enum ReplayError {
    /// An I/O error occurred while reading the replay source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a Warcraft III replay, or its header is cut short.
    #[error("Not a replay file: {reason}")]
    Format {
        /// A description of what failed to match.
        reason: String,
    },

    /// A compressed block could not be read or inflated.
    ///
    /// Block boundaries cannot be re-synchronized from inflated output, so
    /// this aborts the whole parse.
    #[error("Corrupt block {index}: {reason}")]
    CorruptBlock {
        /// Zero-based index of the failing block.
        index: u32,
        /// A description of the failure.
        reason: String,
    },

    /// A fixed-size field or a string terminator is missing from a record.
    #[error("Truncated record: expected {expected} bytes, but only {available} available")]
    TruncatedRecord {
        /// The number of bytes required from the record start.
        expected: usize,
        /// The number of bytes actually present.
        available: usize,
    },
}

impl ReplayError {
    /// Creates a `Format` error for a signature mismatch.
    ///
    /// The bytes found are rendered as hex for display.
    ///
    /// ```
    /// use w3g_replay::error::ReplayError;
    ///
    /// let err = ReplayError::invalid_signature(b"\x00\x01\x02\x03");
    /// assert!(err.to_string().contains("00 01 02 03"));
    /// ```
    #[must_use]
    pub fn invalid_signature(found: &[u8]) -> Self {
        ReplayError::Format {
            reason: format!("unexpected signature {}", bytes_to_hex(found)),
        }
    }

    /// Creates a `TruncatedRecord` error with the given sizes.
    #[must_use]
    pub fn truncated(expected: usize, available: usize) -> Self {
        ReplayError::TruncatedRecord {
            expected,
            available,
        }
    }

    /// Creates a `CorruptBlock` error for the block at `index`.
    #[must_use]
    pub fn corrupt_block(index: u32, reason: impl Into<String>) -> Self {
        ReplayError::CorruptBlock {
            index,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors the block walker recovers from.
    #[must_use]
    pub fn is_truncation(&self) -> bool {
        matches!(self, ReplayError::TruncatedRecord { .. })
    }
}

/// Converts a byte slice to a hexadecimal string representation.
///
/// Up to 8 bytes are shown space-separated; longer slices are elided.
fn bytes_to_hex(bytes: &[u8]) -> String {
    let shown = &bytes[..bytes.len().min(8)];
    let prefix = shown
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ");
    if bytes.len() <= 8 {
        prefix
    } else {
        format!("{prefix}... ({} bytes total)", bytes.len())
    }
}

/// A specialized Result type for replay decoding.
pub type Result<T> = std::result::Result<T, ReplayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReplayError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        assert!(err.to_string().contains("I/O error"));

        let err = ReplayError::invalid_signature(b"BAD!");
        assert!(err.to_string().contains("Not a replay file"));

        let err = ReplayError::corrupt_block(3, "invalid zlib stream");
        assert!(err.to_string().contains("Corrupt block 3"));
        assert!(err.to_string().contains("invalid zlib stream"));

        let err = ReplayError::truncated(10, 4);
        assert!(err.to_string().contains("expected 10 bytes"));
        assert!(err.to_string().contains("4 available"));
    }

    #[test]
    fn test_bytes_to_hex_short() {
        assert_eq!(bytes_to_hex(b"W3XP"), "57 33 58 50");
    }

    #[test]
    fn test_bytes_to_hex_long() {
        let result = bytes_to_hex(b"Warcraft III recorded game");
        assert!(result.contains("..."));
        assert!(result.contains("26 bytes total"));
    }

    #[test]
    fn test_is_truncation() {
        assert!(ReplayError::truncated(2, 1).is_truncation());
        assert!(!ReplayError::corrupt_block(0, "x").is_truncation());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReplayError>();
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "test error");
        let err: ReplayError = io_err.into();
        assert!(matches!(err, ReplayError::Io(_)));
    }
}
