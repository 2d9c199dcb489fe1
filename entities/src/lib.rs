//! Entity state objects, change tracking, and the kind factory for propwire.
//!
//! An [`Entity`] owns the property values for one simulated object. Its kind
//! is fixed at construction and selects the descriptor catalog that shapes
//! its storage; the codec only ever borrows an entity for the duration of a
//! single encode or decode call.
//!
//! # Design Principles
//!
//! - **Kind set exactly once** - the factory decides the catalog; nothing
//!   can change it afterwards.
//! - **Setters track change** - edits mark per-property changed flags and
//!   bump the last-edited timestamp; decode-side assignment bypasses both.
//! - **Exclusive ownership** - values live in the entity, not the codec.

mod entity;
mod error;
mod types;

pub use entity::Entity;
pub use error::{EntityError, EntityResult};
pub use types::{EntityId, Timestamp};
