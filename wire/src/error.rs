//! Error types for record framing.

use std::fmt;

use bytecoder::ByteError;
use schema::SchemaError;

/// Result type for wire operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors that can occur while decoding record framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Byte-level error (truncation, bad count marker).
    Bytes(ByteError),

    /// Flag-region error (truncation, hostile length prefix).
    Flags(SchemaError),

    /// The kind tag field does not fit a 16-bit tag.
    KindTagOutOfRange {
        /// The decoded tag value.
        tag: u64,
    },

    /// The declared value region exceeds the configured limit.
    ValueRegionTooLarge {
        /// Declared value-region length.
        len: u64,
        /// Maximum permitted length.
        max: usize,
    },
}

/// Errors that can occur while encoding record framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The value region exceeds the configured limit.
    ValueRegionTooLarge {
        /// Value-region length.
        len: usize,
        /// Maximum permitted length.
        max: usize,
    },

    /// The flag set uses more bits than the configured limit.
    FlagBitsTooLarge {
        /// Significant bit count.
        bits: usize,
        /// Maximum permitted bits.
        max: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(e) => write!(f, "byte error: {e}"),
            Self::Flags(e) => write!(f, "flag region error: {e}"),
            Self::KindTagOutOfRange { tag } => {
                write!(f, "kind tag {tag} does not fit 16 bits")
            }
            Self::ValueRegionTooLarge { len, max } => {
                write!(f, "value region of {len} bytes exceeds limit of {max}")
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueRegionTooLarge { len, max } => {
                write!(f, "value region of {len} bytes exceeds limit of {max}")
            }
            Self::FlagBitsTooLarge { bits, max } => {
                write!(f, "flag set of {bits} bits exceeds limit of {max}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            Self::Flags(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<ByteError> for DecodeError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}

impl From<SchemaError> for DecodeError {
    fn from(err: SchemaError) -> Self {
        Self::Flags(err)
    }
}
