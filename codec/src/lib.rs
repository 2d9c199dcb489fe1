//! Budgeted property append/read and entity record codec for propwire.
//!
//! This is the main codec crate. It ties bytecoder, schema, entities, and
//! wire together to encode a subset of an entity's properties into a
//! size-bounded buffer and to reconstruct entity state from the matching
//! flag stream.
//!
//! # Features
//!
//! - Canonical-order property appending under a byte budget, with an
//!   explicit didn't-fit report for follow-up packets
//! - Flag-driven property reading, with decode-and-discard for stale data
//! - Whole-record framing: encode, factory decode, apply with stale gating
//! - Scratch reuse for steady-state encoding
//!
//! # Design Principles
//!
//! - **Budget exhaustion is an outcome, not an error** - large updates span
//!   packets through the didn't-fit report.
//! - **No partial values** - a property either fits whole or is withheld.
//! - **Purely functional over its inputs** - no interior state; concurrent
//!   encodes of different entities share nothing.

mod append;
mod error;
mod limits;
mod read;
mod record;
mod scratch;
mod value;

pub use append::{append_properties, append_properties_with_scratch, AppendOutcome, AppendState};
pub use error::{CodecError, CodecResult};
pub use limits::CodecLimits;
pub use read::{read_properties, read_properties_gated, ReadMode, ReadOutcome};
pub use record::{
    apply_record, decode_record, encode_record, encode_record_with_scratch, ApplyOutcome,
    DecodedRecord,
};
pub use scratch::CodecScratch;
pub use wire::Limits as WireLimits;
