//! Whole-record encode, factory decode, and gated apply.

use bytecoder::{counted_len, ByteReader, ByteWriter};
use entities::{Entity, EntityId, Timestamp};
use schema::{EntityKind, PropertyFlags};
use wire::{decode_record_header, encode_record_header, Limits as WireLimits, RecordHeader};

use crate::append::{append_into, AppendOutcome, AppendState};
use crate::error::{CodecError, CodecResult};
use crate::limits::CodecLimits;
use crate::read::{read_properties, read_properties_gated, ReadMode};
use crate::scratch::CodecScratch;

/// The result of decoding a record into a fresh entity.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// The materialized entity.
    pub entity: Entity,
    /// The flag set that traveled with the record.
    pub present: PropertyFlags,
    /// Total bytes consumed, including framing.
    pub bytes_consumed: usize,
}

/// The result of applying a record onto an existing entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// `false` when the record was stale and nothing was assigned.
    pub applied: bool,
    /// Total bytes consumed, including framing.
    pub bytes_consumed: usize,
}

/// Encodes one framed entity record under a whole-record byte budget.
///
/// The value-region budget is the record budget minus a header reservation
/// computed from the *requested* candidate set, an upper bound for what is
/// actually encoded, so the finished record never exceeds `budget`. When
/// not even the header fits, or no candidate value fits, nothing is written
/// and every applicable requested property is reported as didn't-fit.
pub fn encode_record(
    entity: &Entity,
    requested: &PropertyFlags,
    budget: usize,
    out: &mut ByteWriter,
    wire_limits: &WireLimits,
    limits: &CodecLimits,
) -> CodecResult<AppendOutcome> {
    let mut scratch = CodecScratch::new();
    encode_record_with_scratch(entity, requested, budget, out, wire_limits, limits, &mut scratch)
}

/// [`encode_record`] with caller-held scratch buffers.
#[allow(clippy::too_many_arguments)]
pub fn encode_record_with_scratch(
    entity: &Entity,
    requested: &PropertyFlags,
    budget: usize,
    out: &mut ByteWriter,
    wire_limits: &WireLimits,
    limits: &CodecLimits,
    scratch: &mut CodecScratch,
) -> CodecResult<AppendOutcome> {
    let mut candidates = requested.clone();
    candidates.intersect_with(&entity.catalog().all_flags());
    if candidates.is_empty() {
        return Ok(AppendOutcome {
            encoded: PropertyFlags::new(),
            didnt_fit: PropertyFlags::new(),
            state: AppendState::Finished,
            property_count: 0,
        });
    }

    let budget = budget.min(wire_limits.max_record_bytes);
    let value_cap = wire_limits.max_value_bytes.min(budget);
    let header_reserve = counted_len(u64::from(entity.kind().tag()))
        + counted_len(entity.id().raw())
        + candidates.encoded_len()
        + counted_len(value_cap as u64);

    if budget < header_reserve {
        return Ok(AppendOutcome {
            encoded: PropertyFlags::new(),
            didnt_fit: candidates,
            state: AppendState::DidntFit,
            property_count: 0,
        });
    }

    let value_budget = (budget - header_reserve).min(wire_limits.max_value_bytes);
    let CodecScratch { property, values } = scratch;
    values.clear();
    let outcome = append_into(entity, &candidates, value_budget, values, limits, property)?;

    if outcome.encoded.is_empty() {
        // Nothing fit; the caller retries with the didn't-fit report.
        return Ok(outcome);
    }

    let header = RecordHeader {
        kind_tag: entity.kind().tag(),
        entity_id: entity.id().raw(),
        flags: outcome.encoded.clone(),
        value_len: values.len(),
    };
    encode_record_header(&header, wire_limits, out)?;
    out.write_bytes(values.as_slice());
    Ok(outcome)
}

/// Decodes one record into a freshly constructed entity.
///
/// The factory path: the kind tag is resolved first, and an unknown tag is
/// [`CodecError::UnknownEntityType`] before any entity exists or any
/// property is touched.
pub fn decode_record(
    bytes: &[u8],
    wire_limits: &WireLimits,
    limits: &CodecLimits,
) -> CodecResult<DecodedRecord> {
    let mut reader = ByteReader::new(bytes);
    let header = decode_record_header(&mut reader, wire_limits)?;
    let Some(kind) = EntityKind::from_tag(header.kind_tag) else {
        return Err(CodecError::UnknownEntityType {
            tag: header.kind_tag,
        });
    };

    let value_bytes = reader.read_bytes(header.value_len)?;
    let mut entity = Entity::new(kind, EntityId::new(header.entity_id), Timestamp::ZERO);
    let mut value_reader = ByteReader::new(value_bytes);
    read_properties(&mut entity, &header.flags, &mut value_reader, true, limits)?;

    Ok(DecodedRecord {
        entity,
        present: header.flags,
        bytes_consumed: reader.position(),
    })
}

/// Applies one record onto an existing entity with stale gating.
///
/// A record whose `LastEdited` is no newer than the entity's is decoded in
/// full and applied not at all; `applied` is `false` and the byte count is
/// still exact, so the caller's cursor stays valid either way.
pub fn apply_record(
    entity: &mut Entity,
    bytes: &[u8],
    wire_limits: &WireLimits,
    limits: &CodecLimits,
) -> CodecResult<ApplyOutcome> {
    let mut reader = ByteReader::new(bytes);
    let header = decode_record_header(&mut reader, wire_limits)?;
    let Some(kind) = EntityKind::from_tag(header.kind_tag) else {
        return Err(CodecError::UnknownEntityType {
            tag: header.kind_tag,
        });
    };
    if kind != entity.kind() {
        return Err(CodecError::KindMismatch {
            expected: entity.kind(),
            found: kind,
        });
    }
    if header.entity_id != entity.id().raw() {
        return Err(CodecError::EntityIdMismatch {
            expected: entity.id().raw(),
            found: header.entity_id,
        });
    }

    let value_bytes = reader.read_bytes(header.value_len)?;
    let local_last_edited = entity.last_edited();
    let mut value_reader = ByteReader::new(value_bytes);
    let outcome = read_properties_gated(
        entity,
        &header.flags,
        &mut value_reader,
        ReadMode::RejectStale { local_last_edited },
        limits,
    )?;

    Ok(ApplyOutcome {
        applied: outcome.applied,
        bytes_consumed: reader.position(),
    })
}
