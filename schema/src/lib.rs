//! Property catalog, flag sets, and entity kind tables for the propwire codec.
//!
//! This crate defines how entity state is identified for replication:
//! - The append-only property identifier enumeration and semantic kinds
//! - Per-entity-kind descriptor catalogs (shared base + kind extensions)
//! - The self-describing property flag set used for presence encoding
//! - Deterministic catalog hashing for version divergence detection
//!
//! # Design Principles
//!
//! - **Data-driven** - entity kinds are rows in constant tables, not types
//!   with virtual dispatch; adding a kind or a property is a data change.
//! - **Append-only identifiers** - property ids are positional in the flag
//!   stream and are never reused or reordered across protocol versions.
//! - **Deterministic hashing** - the catalog hash is stable given the same
//!   tables.

mod catalog;
mod error;
mod flags;
mod hash;
mod property;

pub use catalog::{
    descriptor_of, extension_descriptors, validate_catalogs, Catalog, EntityKind,
    PropertyDescriptor, BASE_DESCRIPTORS, ENTITY_KINDS,
};
pub use error::{SchemaError, SchemaResult};
pub use flags::PropertyFlags;
pub use hash::catalog_hash;
pub use property::{BillboardMode, PropertyId, PropertyKind, PropertyValue, Quat, Rgb, Vec3};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = PropertyId::Color;
        let _ = PropertyKind::Rgb;
        let _ = PropertyValue::Bool(true);
        let _ = PropertyFlags::new();
        let _ = EntityKind::Box;
        let _ = Catalog::of(EntityKind::Box);
        let _ = catalog_hash();
        let _: SchemaResult<()> = Ok(());
    }

    #[test]
    fn catalogs_are_valid() {
        validate_catalogs().expect("built-in catalogs must validate");
    }
}
