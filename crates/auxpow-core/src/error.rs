//! Error types for block decoding.

use thiserror::Error;

/// A decoded value violated a structural constraint of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A varint used a wider encoding than its value requires.
    #[error("non-canonical varint: {value} encoded with marker {marker:#04x}")]
    NonCanonicalVarInt { marker: u8, value: u64 },
    /// A count prefix does not fit the platform's address space.
    #[error("count prefix for {field} is too large: {count}")]
    CountTooLarge { field: &'static str, count: u64 },
    /// Input remained after a complete block was decoded.
    #[error("{0} trailing bytes after block")]
    TrailingBytes(usize),
    /// The segwit marker was present but the flag byte was not 0x01.
    #[error("invalid witness flag: {0:#04x}")]
    InvalidWitnessFlag(u8),
    /// The witness layout was used but every witness stack was empty.
    #[error("superfluous witness record")]
    SuperfluousWitness,
    /// Hex input could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

/// Errors produced while decoding blocks, headers and their parts.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the format requires at the current position.
    #[error("truncated input reading {field}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
    /// A decoded value violates a structural constraint.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    /// Failure reported by a delegated header or transaction decoder.
    #[error("collaborator decoder failed: {0}")]
    Collaborator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DecodeError {
    /// Wrap an error raised by an injected decoder.
    pub fn collaborator<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        DecodeError::Collaborator(err.into())
    }

    /// True when the input ended before the format was satisfied.
    pub fn is_truncated(&self) -> bool {
        matches!(self, DecodeError::TruncatedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_collaborator_keeps_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad script");
        let err = DecodeError::collaborator(inner);

        let source = err.source().expect("source preserved");
        assert_eq!(source.to_string(), "bad script");
        assert!(!err.is_truncated());
    }

    #[test]
    fn test_truncated_display() {
        let err = DecodeError::TruncatedInput {
            field: "side_mask",
            needed: 4,
            remaining: 1,
        };
        assert!(err.is_truncated());
        assert_eq!(
            err.to_string(),
            "truncated input reading side_mask: needed 4 bytes, 1 remaining"
        );
    }
}
