//! Flag-driven property reading in canonical order.

use bytecoder::ByteReader;
use entities::{Entity, Timestamp};
use schema::{descriptor_of, PropertyFlags, PropertyId, PropertyValue};

use crate::error::CodecResult;
use crate::limits::CodecLimits;
use crate::value::read_property_value;

/// How decoded values are applied to the target entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Assign every decoded value.
    Overwrite,
    /// Decode and discard; the cursor still advances correctly.
    Discard,
    /// Assign only when the stream's `LastEdited` is newer than this.
    ///
    /// A stale stream is decoded in full and applied not at all, so a
    /// late-arriving packet can never clobber a newer local edit.
    RejectStale {
        /// The entity's current last-edited timestamp.
        local_last_edited: Timestamp,
    },
}

/// The result of a gated read pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Bytes consumed from the reader.
    pub bytes_consumed: usize,
    /// `true` if decoded values were assigned to the entity.
    pub applied: bool,
}

/// Reads the flagged properties from `reader` into `entity`.
///
/// Properties are decoded in the same canonical ascending-identifier order
/// the appender used. When `overwrite_local_data` is false every value is
/// decoded and discarded; the cursor must advance identically either way.
///
/// Flag bits beyond the known catalog are ignored: append-only identifiers
/// guarantee their values sit at the tail of the value region, which the
/// record layer steps over via the value-region length. Returns the number
/// of bytes consumed.
pub fn read_properties(
    entity: &mut Entity,
    flags: &PropertyFlags,
    reader: &mut ByteReader<'_>,
    overwrite_local_data: bool,
    limits: &CodecLimits,
) -> CodecResult<usize> {
    let mode = if overwrite_local_data {
        ReadMode::Overwrite
    } else {
        ReadMode::Discard
    };
    let outcome = read_properties_gated(entity, flags, reader, mode, limits)?;
    Ok(outcome.bytes_consumed)
}

/// Reads the flagged properties with an application gate.
///
/// Values are fully decoded before any assignment, so a gated-out stream
/// (stale, or [`ReadMode::Discard`]) leaves the entity untouched while the
/// cursor still lands exactly past the known properties.
pub fn read_properties_gated(
    entity: &mut Entity,
    flags: &PropertyFlags,
    reader: &mut ByteReader<'_>,
    mode: ReadMode,
    limits: &CodecLimits,
) -> CodecResult<ReadOutcome> {
    let start = reader.position();

    let mut decoded: Vec<(PropertyId, PropertyValue)> = Vec::new();
    let mut stream_edited: Option<Timestamp> = None;
    for raw in flags.iter() {
        // Unknown ids are append-only, so the first unknown bit means every
        // remaining flagged value is unknown tail data.
        let Some(id) = PropertyId::from_raw(raw) else {
            break;
        };
        let desc = descriptor_of(id);
        let value = read_property_value(desc, reader, limits)?;
        if id == PropertyId::LastEdited {
            if let PropertyValue::Timestamp(micros) = value {
                stream_edited = Some(Timestamp::new(micros));
            }
        }
        decoded.push((id, value));
    }

    let apply = match mode {
        ReadMode::Overwrite => true,
        ReadMode::Discard => false,
        ReadMode::RejectStale { local_last_edited } => {
            stream_edited.map_or(true, |edited| edited > local_last_edited)
        }
    };

    if apply {
        let catalog = entity.catalog();
        for (id, value) in decoded {
            // A flagged id this kind does not carry never comes from a
            // well-formed writer; drop it rather than desynchronize.
            if catalog.contains(id) {
                entity.apply(id, value)?;
            }
        }
    }

    Ok(ReadOutcome {
        bytes_consumed: reader.position() - start,
        applied: apply,
    })
}
