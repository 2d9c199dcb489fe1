//! Entity kind tags and per-kind descriptor catalogs.

use std::fmt;

use crate::error::{SchemaError, SchemaResult};
use crate::flags::PropertyFlags;
use crate::property::{
    BillboardMode, PropertyId, PropertyKind, PropertyValue, Quat, Rgb, Vec3,
};

/// The kind tag of an entity.
///
/// Tags are stable wire values; tag zero is reserved so a zeroed buffer can
/// never alias a valid kind. An unknown tag at decode is an error, never a
/// fallback kind; guessing would desynchronize the property catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Box,
    Sphere,
    Light,
    Text,
    Model,
}

/// Every registered entity kind, in tag order.
pub const ENTITY_KINDS: &[EntityKind] = &[
    EntityKind::Box,
    EntityKind::Sphere,
    EntityKind::Light,
    EntityKind::Text,
    EntityKind::Model,
];

impl EntityKind {
    /// Returns the stable wire tag.
    #[must_use]
    pub const fn tag(self) -> u16 {
        match self {
            Self::Box => 1,
            Self::Sphere => 2,
            Self::Light => 3,
            Self::Text => 4,
            Self::Model => 5,
        }
    }

    /// Looks up a kind from its wire tag.
    #[must_use]
    pub const fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(Self::Box),
            2 => Some(Self::Sphere),
            3 => Some(Self::Light),
            4 => Some(Self::Text),
            5 => Some(Self::Model),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A registry entry: identifier plus semantic kind.
///
/// The default value and the encode/decode pair are both selected by
/// [`PropertyKind`]; descriptors stay `const`-constructible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub id: PropertyId,
    pub kind: PropertyKind,
}

impl PropertyDescriptor {
    const fn new(id: PropertyId, kind: PropertyKind) -> Self {
        Self { id, kind }
    }

    /// Returns the default value an entity starts with for this property.
    #[must_use]
    pub fn default_value(&self) -> PropertyValue {
        match self.id {
            PropertyId::Created | PropertyId::LastEdited => PropertyValue::Timestamp(0),
            PropertyId::Position | PropertyId::Velocity | PropertyId::Gravity => {
                PropertyValue::Vec3(Vec3::ZERO)
            }
            PropertyId::Dimensions => PropertyValue::Vec3(Vec3::splat(0.1)),
            PropertyId::Rotation => PropertyValue::Quat(Quat::IDENTITY),
            PropertyId::Damping => PropertyValue::F32(0.39),
            // Negative lifetime means immortal.
            PropertyId::Lifetime => PropertyValue::F32(-1.0),
            PropertyId::Visible => PropertyValue::Bool(true),
            PropertyId::Locked | PropertyId::IsSpotlight | PropertyId::AnimationPlaying => {
                PropertyValue::Bool(false)
            }
            PropertyId::Script
            | PropertyId::Text
            | PropertyId::ModelUrl
            | PropertyId::AnimationUrl => PropertyValue::Str(String::new()),
            PropertyId::Color | PropertyId::TextColor => PropertyValue::Rgb(Rgb::WHITE),
            PropertyId::BackgroundColor => PropertyValue::Rgb(Rgb::BLACK),
            PropertyId::Intensity => PropertyValue::F32(1.0),
            PropertyId::Exponent => PropertyValue::F32(0.0),
            PropertyId::Cutoff => PropertyValue::F32(45.0),
            PropertyId::LineHeight => PropertyValue::F32(0.1),
            PropertyId::AnimationFps => PropertyValue::F32(30.0),
            PropertyId::BillboardMode => PropertyValue::Enum(BillboardMode::Flat as u8),
        }
    }
}

/// Base descriptors shared by every entity kind, ascending by id.
pub const BASE_DESCRIPTORS: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(PropertyId::Created, PropertyKind::Timestamp),
    PropertyDescriptor::new(PropertyId::LastEdited, PropertyKind::Timestamp),
    PropertyDescriptor::new(PropertyId::Position, PropertyKind::Vec3),
    PropertyDescriptor::new(PropertyId::Dimensions, PropertyKind::Vec3),
    PropertyDescriptor::new(PropertyId::Rotation, PropertyKind::Quat),
    PropertyDescriptor::new(PropertyId::Velocity, PropertyKind::Vec3),
    PropertyDescriptor::new(PropertyId::Gravity, PropertyKind::Vec3),
    PropertyDescriptor::new(PropertyId::Damping, PropertyKind::F32),
    PropertyDescriptor::new(PropertyId::Lifetime, PropertyKind::F32),
    PropertyDescriptor::new(PropertyId::Visible, PropertyKind::Bool),
    PropertyDescriptor::new(PropertyId::Locked, PropertyKind::Bool),
    PropertyDescriptor::new(PropertyId::Script, PropertyKind::Str),
];

const COLOR: PropertyDescriptor = PropertyDescriptor::new(PropertyId::Color, PropertyKind::Rgb);

const BOX_EXTENSION: &[PropertyDescriptor] = &[COLOR];

const SPHERE_EXTENSION: &[PropertyDescriptor] = &[COLOR];

const LIGHT_EXTENSION: &[PropertyDescriptor] = &[
    COLOR,
    PropertyDescriptor::new(PropertyId::Intensity, PropertyKind::F32),
    PropertyDescriptor::new(PropertyId::IsSpotlight, PropertyKind::Bool),
    PropertyDescriptor::new(PropertyId::Exponent, PropertyKind::F32),
    PropertyDescriptor::new(PropertyId::Cutoff, PropertyKind::F32),
];

const TEXT_EXTENSION: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(PropertyId::Text, PropertyKind::Str),
    PropertyDescriptor::new(PropertyId::LineHeight, PropertyKind::F32),
    PropertyDescriptor::new(PropertyId::TextColor, PropertyKind::Rgb),
    PropertyDescriptor::new(PropertyId::BackgroundColor, PropertyKind::Rgb),
    PropertyDescriptor::new(
        PropertyId::BillboardMode,
        PropertyKind::Enum {
            count: BillboardMode::COUNT,
        },
    ),
];

const MODEL_EXTENSION: &[PropertyDescriptor] = &[
    PropertyDescriptor::new(PropertyId::ModelUrl, PropertyKind::Str),
    PropertyDescriptor::new(PropertyId::AnimationUrl, PropertyKind::Str),
    PropertyDescriptor::new(PropertyId::AnimationFps, PropertyKind::F32),
    PropertyDescriptor::new(PropertyId::AnimationPlaying, PropertyKind::Bool),
];

/// Returns the extension descriptors a kind adds on top of the base set.
#[must_use]
pub const fn extension_descriptors(kind: EntityKind) -> &'static [PropertyDescriptor] {
    match kind {
        EntityKind::Box => BOX_EXTENSION,
        EntityKind::Sphere => SPHERE_EXTENSION,
        EntityKind::Light => LIGHT_EXTENSION,
        EntityKind::Text => TEXT_EXTENSION,
        EntityKind::Model => MODEL_EXTENSION,
    }
}

/// The full property catalog of one entity kind.
///
/// A catalog is the base descriptor list followed by the kind's extension
/// descriptors, ascending by id. Slot positions index entity value storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    kind: EntityKind,
}

impl Catalog {
    /// Returns the catalog for a kind.
    #[must_use]
    pub const fn of(kind: EntityKind) -> Self {
        Self { kind }
    }

    /// Returns the kind this catalog belongs to.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        self.kind
    }

    /// Returns the number of properties in the catalog.
    #[must_use]
    pub fn len(self) -> usize {
        BASE_DESCRIPTORS.len() + extension_descriptors(self.kind).len()
    }

    /// Catalogs are never empty; the base set is always present.
    #[must_use]
    pub fn is_empty(self) -> bool {
        false
    }

    /// Iterates descriptors in canonical (ascending id) order.
    pub fn descriptors(self) -> impl Iterator<Item = &'static PropertyDescriptor> {
        BASE_DESCRIPTORS
            .iter()
            .chain(extension_descriptors(self.kind).iter())
    }

    /// Returns the descriptor at a storage slot.
    #[must_use]
    pub fn get(self, slot: usize) -> Option<&'static PropertyDescriptor> {
        let base = BASE_DESCRIPTORS.len();
        if slot < base {
            BASE_DESCRIPTORS.get(slot)
        } else {
            extension_descriptors(self.kind).get(slot - base)
        }
    }

    /// Resolves a property to its storage slot, if this kind carries it.
    #[must_use]
    pub fn index_of(self, id: PropertyId) -> Option<usize> {
        self.descriptors().position(|desc| desc.id == id)
    }

    /// Returns `true` if this kind carries the property.
    #[must_use]
    pub fn contains(self, id: PropertyId) -> bool {
        self.index_of(id).is_some()
    }

    /// Returns a flag set with every property of this catalog set.
    #[must_use]
    pub fn all_flags(self) -> PropertyFlags {
        self.descriptors().map(|desc| desc.id).collect()
    }
}

/// Returns the registry descriptor for a known property.
///
/// Descriptors are shared across kind catalogs (validated by
/// [`validate_catalogs`]), so the first match is authoritative.
#[must_use]
pub fn descriptor_of(id: PropertyId) -> &'static PropertyDescriptor {
    BASE_DESCRIPTORS
        .iter()
        .chain(
            ENTITY_KINDS
                .iter()
                .flat_map(|kind| extension_descriptors(*kind).iter()),
        )
        .find(|desc| desc.id == id)
        .expect("every property id appears in at least one catalog")
}

/// Validates every built-in catalog.
///
/// Checks per-catalog id uniqueness, ascending order (base first, then
/// extensions, all strictly increasing), non-zero enum counts, and that a
/// property shared by several kinds carries the same descriptor everywhere.
/// The tables are constants, so this is exercised by tests rather than at
/// runtime.
pub fn validate_catalogs() -> SchemaResult<()> {
    let mut seen: Vec<(u16, PropertyKind)> = Vec::new();
    for kind in ENTITY_KINDS {
        for desc in Catalog::of(*kind).descriptors() {
            let raw = desc.id.raw();
            match seen.iter().find(|(seen_raw, _)| *seen_raw == raw) {
                Some((_, seen_kind)) if *seen_kind != desc.kind => {
                    return Err(SchemaError::DescriptorConflict { raw });
                }
                Some(_) => {}
                None => seen.push((raw, desc.kind)),
            }
        }
    }

    for kind in ENTITY_KINDS {
        let catalog = Catalog::of(*kind);
        let mut prev: Option<u16> = None;
        for desc in catalog.descriptors() {
            let raw = desc.id.raw();
            if let Some(prev_raw) = prev {
                if raw == prev_raw {
                    return Err(SchemaError::DuplicatePropertyId { raw });
                }
                if raw < prev_raw {
                    return Err(SchemaError::CatalogOrder {
                        kind_tag: kind.tag(),
                        raw,
                    });
                }
            }
            prev = Some(raw);

            if let PropertyKind::Enum { count } = desc.kind {
                if count == 0 {
                    return Err(SchemaError::EnumCountZero { raw });
                }
            }
        }
    }
    Ok(())
}
