//! Deterministic catalog hashing.

use blake3::Hasher;

use crate::catalog::{extension_descriptors, PropertyDescriptor, BASE_DESCRIPTORS, ENTITY_KINDS};
use crate::property::PropertyKind;

/// Computes a deterministic hash of the built-in property catalog.
///
/// Collaborators exchange this value before decoding; a mismatch means the
/// two ends were built against diverged catalogs and positional flag bits
/// cannot be trusted.
#[must_use]
pub fn catalog_hash() -> u64 {
    let mut hasher = Hasher::new();

    write_u32(&mut hasher, BASE_DESCRIPTORS.len() as u32);
    for desc in BASE_DESCRIPTORS {
        write_descriptor(&mut hasher, desc);
    }

    write_u32(&mut hasher, ENTITY_KINDS.len() as u32);
    for kind in ENTITY_KINDS {
        write_u16(&mut hasher, kind.tag());
        let extension = extension_descriptors(*kind);
        write_u32(&mut hasher, extension.len() as u32);
        for desc in extension {
            write_descriptor(&mut hasher, desc);
        }
    }

    let hash = hasher.finalize();
    let bytes = hash.as_bytes();
    u64::from_le_bytes(bytes[0..8].try_into().expect("hash is at least 8 bytes"))
}

fn write_descriptor(hasher: &mut Hasher, desc: &PropertyDescriptor) {
    write_u16(hasher, desc.id.raw());
    write_kind(hasher, desc.kind);
}

fn write_kind(hasher: &mut Hasher, kind: PropertyKind) {
    match kind {
        PropertyKind::Bool => write_u8(hasher, 0),
        PropertyKind::F32 => write_u8(hasher, 1),
        PropertyKind::Timestamp => write_u8(hasher, 2),
        PropertyKind::Vec3 => write_u8(hasher, 3),
        PropertyKind::Quat => write_u8(hasher, 4),
        PropertyKind::Rgb => write_u8(hasher, 5),
        PropertyKind::Str => write_u8(hasher, 6),
        PropertyKind::Enum { count } => {
            write_u8(hasher, 7);
            write_u8(hasher, count);
        }
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u16(hasher: &mut Hasher, value: u16) {
    hasher.update(&value.to_le_bytes());
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
