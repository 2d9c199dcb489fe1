//! Per-entity record framing for the propwire codec.
//!
//! This crate handles the binary record layout: kind tag, entity id, the
//! self-length-prefixed flag region, and the value-region length. It does
//! not interpret property values, only the structure around them, which is
//! what lets a consumer skip a record it cannot decode.
//!
//! # Record layout
//!
//! ```text
//! [kind tag : counted] [entity id : counted] [flag bytes : self-prefixed]
//! [value len : counted] [value bytes ...]
//! ```
//!
//! # Design Principles
//!
//! - **Bounded decoding** - every length field is validated against
//!   [`Limits`] before it drives allocation or iteration.
//! - **Skippable records** - both variable regions carry their own length,
//!   so resynchronization never requires understanding the contents.
//! - **No domain knowledge** - kind tags stay raw here; resolving them is
//!   the codec's job.

mod error;
mod limits;
mod record;

pub use error::{DecodeError, EncodeError, WireResult};
pub use limits::Limits;
pub use record::{decode_record_header, encode_record_header, skip_record, RecordHeader};
