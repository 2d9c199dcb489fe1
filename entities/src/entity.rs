//! The entity object: typed property storage with change tracking.

use schema::{
    Catalog, EntityKind, PropertyDescriptor, PropertyFlags, PropertyId, PropertyKind,
    PropertyValue,
};

use crate::error::{EntityError, EntityResult};
use crate::types::{EntityId, Timestamp};

/// A simulated object with a fixed kind and an owned property set.
///
/// The kind is set exactly once, at construction, and selects the descriptor
/// catalog whose slots back `values`. `Created` and `LastEdited` live in
/// their ordinary property slots and have typed accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    values: Vec<PropertyValue>,
    changed: PropertyFlags,
}

impl Entity {
    /// Creates an entity of the given kind with default-valued properties.
    ///
    /// This is the factory path used both by the simulation layer and by
    /// the codec when materializing an entity from the wire.
    #[must_use]
    pub fn new(kind: EntityKind, id: EntityId, created: Timestamp) -> Self {
        let catalog = Catalog::of(kind);
        let mut values: Vec<PropertyValue> = catalog
            .descriptors()
            .map(PropertyDescriptor::default_value)
            .collect();

        let created_slot = catalog
            .index_of(PropertyId::Created)
            .expect("base catalog carries Created");
        values[created_slot] = PropertyValue::Timestamp(created.micros());
        let edited_slot = catalog
            .index_of(PropertyId::LastEdited)
            .expect("base catalog carries LastEdited");
        values[edited_slot] = PropertyValue::Timestamp(created.micros());

        Self {
            id,
            kind,
            values,
            changed: PropertyFlags::new(),
        }
    }

    /// Returns the entity identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the kind fixed at construction.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the descriptor catalog for this entity's kind.
    #[must_use]
    pub const fn catalog(&self) -> Catalog {
        Catalog::of(self.kind)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created(&self) -> Timestamp {
        self.timestamp_property(PropertyId::Created)
    }

    /// Returns the last-edited timestamp.
    #[must_use]
    pub fn last_edited(&self) -> Timestamp {
        self.timestamp_property(PropertyId::LastEdited)
    }

    /// Returns the current value of a property, if this kind carries it.
    #[must_use]
    pub fn get(&self, id: PropertyId) -> Option<&PropertyValue> {
        let slot = self.catalog().index_of(id)?;
        self.values.get(slot)
    }

    /// Sets a property value, marking its changed flag.
    ///
    /// Returns `Ok(false)` without marking anything when the stored value is
    /// already equal. Values are validated against the descriptor before
    /// storage, so a successful set never leaves mismatched state behind.
    pub fn set(&mut self, id: PropertyId, value: PropertyValue) -> EntityResult<bool> {
        let slot = self.checked_slot(id, &value)?;
        if self.values[slot] == value {
            return Ok(false);
        }
        self.values[slot] = value;
        self.changed.set(id);
        Ok(true)
    }

    /// Sets a property and bumps `LastEdited` when the value changed.
    ///
    /// This is the script/interaction entry point; the decode path uses
    /// [`Entity::apply`] instead so remote state does not look locally
    /// edited.
    pub fn edit(
        &mut self,
        id: PropertyId,
        value: PropertyValue,
        at: Timestamp,
    ) -> EntityResult<bool> {
        let changed = self.set(id, value)?;
        if changed && id != PropertyId::LastEdited {
            self.set_last_edited(at);
        }
        Ok(changed)
    }

    /// Overwrites `LastEdited`, marking it changed.
    pub fn set_last_edited(&mut self, at: Timestamp) {
        let slot = self
            .catalog()
            .index_of(PropertyId::LastEdited)
            .expect("base catalog carries LastEdited");
        self.values[slot] = PropertyValue::Timestamp(at.micros());
        self.changed.set(PropertyId::LastEdited);
    }

    /// Assigns a decoded value without touching change tracking.
    pub fn apply(&mut self, id: PropertyId, value: PropertyValue) -> EntityResult<()> {
        let slot = self.checked_slot(id, &value)?;
        self.values[slot] = value;
        Ok(())
    }

    /// Returns the accumulated changed flags.
    #[must_use]
    pub const fn changed(&self) -> &PropertyFlags {
        &self.changed
    }

    /// Returns `true` if any property changed since the last drain.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Drains and returns the changed flags.
    pub fn take_changed(&mut self) -> PropertyFlags {
        std::mem::take(&mut self.changed)
    }

    fn timestamp_property(&self, id: PropertyId) -> Timestamp {
        match self.get(id) {
            Some(PropertyValue::Timestamp(micros)) => Timestamp::new(*micros),
            // Timestamp slots are validated on every write.
            _ => Timestamp::ZERO,
        }
    }

    fn checked_slot(&self, id: PropertyId, value: &PropertyValue) -> EntityResult<usize> {
        let catalog = self.catalog();
        let Some(slot) = catalog.index_of(id) else {
            return Err(EntityError::NotInCatalog {
                kind: self.kind,
                id,
            });
        };
        let desc = catalog.get(slot).expect("slot came from index_of");
        if !value.matches(desc.kind) {
            return Err(EntityError::KindMismatch {
                id,
                expected: kind_label(desc.kind),
                found: value.kind_name(),
            });
        }
        if let (PropertyKind::Enum { count }, PropertyValue::Enum(raw)) = (desc.kind, value) {
            if *raw >= count {
                return Err(EntityError::EnumOutOfRange {
                    id,
                    raw: *raw,
                    count,
                });
            }
        }
        Ok(slot)
    }
}

const fn kind_label(kind: PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Bool => "bool",
        PropertyKind::F32 => "f32",
        PropertyKind::Timestamp => "timestamp",
        PropertyKind::Vec3 => "vec3",
        PropertyKind::Quat => "quat",
        PropertyKind::Rgb => "rgb",
        PropertyKind::Str => "str",
        PropertyKind::Enum { .. } => "enum",
    }
}
