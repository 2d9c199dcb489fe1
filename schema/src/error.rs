//! Error types for schema and flag-set operations.

use std::fmt;

use bytecoder::ByteError;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors from flag-set decoding and catalog validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaError {
    /// Byte-level error while decoding a flag stream.
    Bytes(ByteError),

    /// A flag stream declared more significant bits than the caller allows.
    FlagsTooLarge {
        /// Declared bit count.
        bits: u64,
        /// Maximum permitted bit count.
        max: usize,
    },

    /// Two descriptors share a property identifier.
    DuplicatePropertyId {
        /// The duplicated raw identifier.
        raw: u16,
    },

    /// A kind catalog is not in ascending identifier order.
    CatalogOrder {
        /// The offending kind tag.
        kind_tag: u16,
        /// The out-of-order raw identifier.
        raw: u16,
    },

    /// An enum-coded property declares zero variants.
    EnumCountZero {
        /// The offending raw identifier.
        raw: u16,
    },

    /// A property shared by several kinds carries conflicting descriptors.
    DescriptorConflict {
        /// The offending raw identifier.
        raw: u16,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(e) => write!(f, "byte error: {e}"),
            Self::FlagsTooLarge { bits, max } => {
                write!(f, "flag stream declares {bits} bits, maximum is {max}")
            }
            Self::DuplicatePropertyId { raw } => {
                write!(f, "duplicate property id {raw} in catalog")
            }
            Self::CatalogOrder { kind_tag, raw } => {
                write!(
                    f,
                    "catalog for kind tag {kind_tag} is out of order at property id {raw}"
                )
            }
            Self::EnumCountZero { raw } => {
                write!(f, "enum property {raw} declares zero variants")
            }
            Self::DescriptorConflict { raw } => {
                write!(f, "property {raw} has conflicting descriptors across kinds")
            }
        }
    }
}

impl std::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bytes(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ByteError> for SchemaError {
    fn from(err: ByteError) -> Self {
        Self::Bytes(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_flags_too_large() {
        let err = SchemaError::FlagsTooLarge { bits: 9000, max: 4096 };
        let msg = err.to_string();
        assert!(msg.contains("9000"), "should mention declared bits");
        assert!(msg.contains("4096"), "should mention the maximum");
    }

    #[test]
    fn error_display_duplicate_id() {
        let err = SchemaError::DuplicatePropertyId { raw: 12 };
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn error_from_byte_error() {
        let byte_err = ByteError::UnexpectedEof {
            requested: 1,
            available: 0,
        };
        let err: SchemaError = byte_err.into();
        assert!(matches!(err, SchemaError::Bytes(_)));
    }

    #[test]
    fn error_source_chains_bytes() {
        let err = SchemaError::Bytes(ByteError::InvalidCount { count: 9, max: 8 });
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_source_none_for_validation() {
        let err = SchemaError::EnumCountZero { raw: 21 };
        assert!(std::error::Error::source(&err).is_none());
    }
}
