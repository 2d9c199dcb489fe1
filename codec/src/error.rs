//! Error types for codec operations.

use std::fmt;

use entities::EntityError;
use schema::{EntityKind, PropertyId};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding entity records.
///
/// Budget exhaustion is deliberately absent: it is reported through
/// [`AppendState::DidntFit`](crate::AppendState) and is a normal outcome.
/// Likewise a stale update is a no-op result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Byte-level error (truncation, bad count marker).
    Bytes(bytecoder::ByteError),

    /// Record framing error.
    Wire(wire::DecodeError),

    /// Record framing could not be encoded.
    WireEncode(wire::EncodeError),

    /// Typed property access on the entity failed.
    Entity(EntityError),

    /// The record's kind tag is not in the registry.
    ///
    /// Guessing a kind would corrupt the property catalog used by the
    /// reader, so no entity is produced.
    UnknownEntityType {
        /// The unrecognized raw tag.
        tag: u16,
    },

    /// The record addresses a different entity than the one supplied.
    EntityIdMismatch { expected: u64, found: u64 },

    /// The record's kind does not match the target entity's kind.
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    /// A stored value does not satisfy its descriptor.
    TypeMismatch {
        id: PropertyId,
        expected: &'static str,
        found: &'static str,
    },

    /// A string property exceeds the configured length limit.
    StringTooLong {
        id: PropertyId,
        len: usize,
        max: usize,
    },

    /// A string property carried invalid UTF-8.
    InvalidUtf8 { id: PropertyId },

    /// An enum-coded property carried an out-of-range raw value.
    EnumOutOfRange { id: PropertyId, raw: u8, count: u8 },
}

impl CodecError {
    /// Returns `true` for errors caused by a malformed input stream, as
    /// opposed to misuse of the API or catalog divergence.
    #[must_use]
    pub const fn is_malformed_stream(&self) -> bool {
        matches!(
            self,
            Self::Bytes(_)
                | Self::Wire(_)
                | Self::StringTooLong { .. }
                | Self::InvalidUtf8 { .. }
                | Self::EnumOutOfRange { .. }
        )
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(e) => write!(f, "byte error: {e}"),
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::WireEncode(e) => write!(f, "wire encode error: {e}"),
            Self::Entity(e) => write!(f, "entity error: {e}"),
            Self::UnknownEntityType { tag } => {
                write!(f, "unknown entity type tag {tag}")
            }
            Self::EntityIdMismatch { expected, found } => {
                write!(f, "record addresses entity {found}, expected {expected}")
            }
            Self::KindMismatch { expected, found } => {
                write!(f, "record kind {found} does not match entity kind {expected}")
            }
            Self::TypeMismatch {
                id,
                expected,
                found,
            } => {
                write!(f, "property {id} expects {expected} but got {found}")
            }
            Self::StringTooLong { id, len, max } => {
                write!(f, "string property {id} of {len} bytes exceeds limit of {max}")
            }
            Self::InvalidUtf8 { id } => {
                write!(f, "string property {id} is not valid UTF-8")
            }
            Self::EnumOutOfRange { id, raw, count } => {
                write!(f, "enum property {id} value {raw} outside range 0..{count}")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            Self::Wire(e) => Some(e),
            Self::WireEncode(e) => Some(e),
            Self::Entity(e) => Some(e),
            _ => None,
        }
    }
}

impl From<bytecoder::ByteError> for CodecError {
    fn from(err: bytecoder::ByteError) -> Self {
        Self::Bytes(err)
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::WireEncode(err)
    }
}

impl From<EntityError> for CodecError {
    fn from(err: EntityError) -> Self {
        Self::Entity(err)
    }
}
