//! Error types for entity property access.

use std::fmt;

use schema::{EntityKind, PropertyId};

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Errors from typed property access on an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// The entity's kind does not carry this property.
    NotInCatalog {
        kind: EntityKind,
        id: PropertyId,
    },

    /// The value's semantic type does not match the descriptor.
    KindMismatch {
        id: PropertyId,
        expected: &'static str,
        found: &'static str,
    },

    /// An enum-coded value is outside the descriptor's declared range.
    EnumOutOfRange {
        id: PropertyId,
        raw: u8,
        count: u8,
    },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInCatalog { kind, id } => {
                write!(f, "{kind} entities do not carry property {id}")
            }
            Self::KindMismatch {
                id,
                expected,
                found,
            } => {
                write!(f, "property {id} expects {expected} but got {found}")
            }
            Self::EnumOutOfRange { id, raw, count } => {
                write!(
                    f,
                    "enum value {raw} for property {id} outside range 0..{count}"
                )
            }
        }
    }
}

impl std::error::Error for EntityError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_not_in_catalog() {
        let err = EntityError::NotInCatalog {
            kind: EntityKind::Box,
            id: PropertyId::Intensity,
        };
        let msg = err.to_string();
        assert!(msg.contains("Box"));
        assert!(msg.contains("Intensity"));
    }

    #[test]
    fn error_display_kind_mismatch() {
        let err = EntityError::KindMismatch {
            id: PropertyId::Color,
            expected: "rgb",
            found: "bool",
        };
        let msg = err.to_string();
        assert!(msg.contains("rgb"));
        assert!(msg.contains("bool"));
    }

    #[test]
    fn error_display_enum_out_of_range() {
        let err = EntityError::EnumOutOfRange {
            id: PropertyId::BillboardMode,
            raw: 7,
            count: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<EntityError>();
    }
}
