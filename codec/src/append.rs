//! Budgeted property appending in canonical order.

use bytecoder::ByteWriter;
use entities::Entity;
use schema::PropertyFlags;

use crate::error::CodecResult;
use crate::limits::CodecLimits;
use crate::scratch::CodecScratch;
use crate::value::write_property_value;

/// Termination state of an append pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendState {
    /// No append has run yet.
    #[default]
    None,
    /// At least one requested property was withheld for budget.
    DidntFit,
    /// Every applicable requested property was encoded.
    Finished,
}

/// The result of one append pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// Properties actually written, in canonical order.
    pub encoded: PropertyFlags,
    /// Requested, applicable properties withheld for budget.
    ///
    /// Feed these back into the next request so unsent properties are never
    /// silently dropped.
    pub didnt_fit: PropertyFlags,
    /// Termination state of the pass.
    pub state: AppendState,
    /// Number of properties written.
    pub property_count: usize,
}

impl AppendOutcome {
    fn empty() -> Self {
        Self {
            encoded: PropertyFlags::new(),
            didnt_fit: PropertyFlags::new(),
            state: AppendState::None,
            property_count: 0,
        }
    }
}

/// Appends the requested properties of `entity` to `out` under `budget`.
///
/// Properties are scanned in canonical ascending-identifier order. Ids the
/// entity's kind does not carry are skipped and appear in neither result
/// set. Each candidate is serialized to scratch first and committed only if
/// it fits the remaining budget whole; on the first miss, that id and every
/// later still-requested id are reported as didn't-fit and the scan stops.
/// The scan never reorders to squeeze in smaller later properties, so
/// committed order and encoded order are identical.
///
/// Budget exhaustion is reported through [`AppendState::DidntFit`], never as
/// an `Err`.
pub fn append_properties(
    entity: &Entity,
    requested: &PropertyFlags,
    budget: usize,
    out: &mut ByteWriter,
    limits: &CodecLimits,
) -> CodecResult<AppendOutcome> {
    let mut scratch = CodecScratch::new();
    append_properties_with_scratch(entity, requested, budget, out, limits, &mut scratch)
}

/// [`append_properties`] with caller-held scratch buffers.
pub fn append_properties_with_scratch(
    entity: &Entity,
    requested: &PropertyFlags,
    budget: usize,
    out: &mut ByteWriter,
    limits: &CodecLimits,
    scratch: &mut CodecScratch,
) -> CodecResult<AppendOutcome> {
    append_into(entity, requested, budget, out, limits, &mut scratch.property)
}

pub(crate) fn append_into(
    entity: &Entity,
    requested: &PropertyFlags,
    budget: usize,
    out: &mut ByteWriter,
    limits: &CodecLimits,
    property_scratch: &mut ByteWriter,
) -> CodecResult<AppendOutcome> {
    let mut outcome = AppendOutcome::empty();
    let mut used = 0usize;
    let mut missed = false;

    for desc in entity.catalog().descriptors() {
        if !requested.test(desc.id) {
            continue;
        }
        if missed {
            outcome.didnt_fit.set(desc.id);
            continue;
        }
        let Some(value) = entity.get(desc.id) else {
            continue;
        };

        property_scratch.clear();
        write_property_value(desc, value, limits, property_scratch)?;
        let size = property_scratch.len();

        if size <= budget - used {
            out.write_bytes(property_scratch.as_slice());
            outcome.encoded.set(desc.id);
            outcome.property_count += 1;
            used += size;
        } else {
            outcome.didnt_fit.set(desc.id);
            missed = true;
        }
    }

    outcome.state = if missed {
        AppendState::DidntFit
    } else {
        AppendState::Finished
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use entities::{EntityId, Timestamp};
    use schema::{EntityKind, PropertyId, PropertyValue, Rgb, Vec3};

    fn box_entity() -> Entity {
        let mut entity = Entity::new(EntityKind::Box, EntityId::new(1), Timestamp::new(100));
        entity
            .set(PropertyId::Color, PropertyValue::Rgb(Rgb::new(12, 34, 56)))
            .unwrap();
        entity
            .set(
                PropertyId::Position,
                PropertyValue::Vec3(Vec3::new(1.0, 2.0, 3.0)),
            )
            .unwrap();
        entity
    }

    #[test]
    fn zero_budget_reports_everything_unfit() {
        let entity = box_entity();
        let requested = PropertyFlags::single(PropertyId::Color);
        let mut out = ByteWriter::new();

        let outcome =
            append_properties(&entity, &requested, 0, &mut out, &CodecLimits::default())
                .unwrap();

        assert!(out.is_empty(), "no partial bytes on budget miss");
        assert!(outcome.encoded.is_empty());
        assert_eq!(outcome.didnt_fit, requested);
        assert_eq!(outcome.state, AppendState::DidntFit);
        assert_eq!(outcome.property_count, 0);
    }

    #[test]
    fn exact_budget_encodes_exactly_the_value() {
        let entity = box_entity();
        let requested = PropertyFlags::single(PropertyId::Color);
        let mut out = ByteWriter::new();

        // An RGB value is exactly three bytes.
        let outcome =
            append_properties(&entity, &requested, 3, &mut out, &CodecLimits::default())
                .unwrap();

        assert_eq!(out.as_slice(), &[12, 34, 56]);
        assert_eq!(outcome.encoded, requested);
        assert!(outcome.didnt_fit.is_empty());
        assert_eq!(outcome.state, AppendState::Finished);
        assert_eq!(outcome.property_count, 1);

        // Decoding with the emitted flag set restores the value.
        let mut target = Entity::new(EntityKind::Box, EntityId::new(1), Timestamp::ZERO);
        let mut reader = bytecoder::ByteReader::new(out.as_slice());
        crate::read::read_properties(
            &mut target,
            &outcome.encoded,
            &mut reader,
            true,
            &CodecLimits::default(),
        )
        .unwrap();
        assert_eq!(
            target.get(PropertyId::Color),
            Some(&PropertyValue::Rgb(Rgb::new(12, 34, 56)))
        );
    }

    #[test]
    fn first_miss_stops_the_scan() {
        let entity = box_entity();
        // Position (12 bytes) sorts before Color (3 bytes). With a budget of
        // 4 the scan misses Position and must NOT reorder to fit Color.
        let requested = PropertyFlags::from_ids(&[PropertyId::Position, PropertyId::Color]);
        let mut out = ByteWriter::new();

        let outcome =
            append_properties(&entity, &requested, 4, &mut out, &CodecLimits::default())
                .unwrap();

        assert!(out.is_empty());
        assert!(outcome.encoded.is_empty());
        assert!(outcome.didnt_fit.test(PropertyId::Position));
        assert!(outcome.didnt_fit.test(PropertyId::Color));
        assert_eq!(outcome.state, AppendState::DidntFit);
    }

    #[test]
    fn partial_fit_reports_remainder() {
        let entity = box_entity();
        let requested = PropertyFlags::from_ids(&[PropertyId::Position, PropertyId::Color]);
        let mut out = ByteWriter::new();

        // Room for Position (12 bytes) but not Color (3 more).
        let outcome =
            append_properties(&entity, &requested, 13, &mut out, &CodecLimits::default())
                .unwrap();

        assert_eq!(out.len(), 12);
        assert!(outcome.encoded.test(PropertyId::Position));
        assert_eq!(
            outcome.didnt_fit,
            PropertyFlags::single(PropertyId::Color)
        );
        assert_eq!(outcome.state, AppendState::DidntFit);
    }

    #[test]
    fn inapplicable_ids_appear_in_neither_set() {
        let entity = box_entity();
        // Intensity is a Light property; a Box encoder skips it entirely.
        let requested = PropertyFlags::from_ids(&[PropertyId::Color, PropertyId::Intensity]);
        let mut out = ByteWriter::new();

        let outcome =
            append_properties(&entity, &requested, 64, &mut out, &CodecLimits::default())
                .unwrap();

        assert_eq!(outcome.encoded, PropertyFlags::single(PropertyId::Color));
        assert!(outcome.didnt_fit.is_empty());
        assert_eq!(outcome.state, AppendState::Finished);
    }

    #[test]
    fn encoded_and_didnt_fit_partition_the_request() {
        let entity = box_entity();
        let requested = entity.catalog().all_flags();

        for budget in 0..128 {
            let mut out = ByteWriter::new();
            let outcome = append_properties(
                &entity,
                &requested,
                budget,
                &mut out,
                &CodecLimits::default(),
            )
            .unwrap();

            let mut overlap = outcome.encoded.clone();
            overlap.intersect_with(&outcome.didnt_fit);
            assert!(overlap.is_empty(), "budget {budget}: sets must be disjoint");

            let mut union = outcome.encoded.clone();
            union.union_with(&outcome.didnt_fit);
            assert_eq!(union, requested, "budget {budget}: sets must cover request");
        }
    }

    #[test]
    fn shrinking_budget_never_grows_encoded() {
        let entity = box_entity();
        let requested = entity.catalog().all_flags();

        let mut prev_count = usize::MAX;
        for budget in (0..128).rev() {
            let mut out = ByteWriter::new();
            let outcome = append_properties(
                &entity,
                &requested,
                budget,
                &mut out,
                &CodecLimits::default(),
            )
            .unwrap();
            assert!(
                outcome.encoded.len() <= prev_count,
                "budget {budget} must not encode more than budget {}",
                budget + 1
            );
            prev_count = outcome.encoded.len();
        }
    }

    #[test]
    fn output_is_deterministic() {
        let entity = box_entity();
        let requested = entity.catalog().all_flags();

        let mut first = ByteWriter::new();
        let a = append_properties(&entity, &requested, 64, &mut first, &CodecLimits::default())
            .unwrap();
        let mut second = ByteWriter::new();
        let b =
            append_properties(&entity, &requested, 64, &mut second, &CodecLimits::default())
                .unwrap();

        assert_eq!(first.as_slice(), second.as_slice());
        assert_eq!(a, b);
    }

    #[test]
    fn empty_request_finishes_with_empty_output() {
        let entity = box_entity();
        let mut out = ByteWriter::new();
        let outcome = append_properties(
            &entity,
            &PropertyFlags::new(),
            64,
            &mut out,
            &CodecLimits::default(),
        )
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(outcome.state, AppendState::Finished);
    }

    #[test]
    fn scratch_reuse_matches_fresh_scratch() {
        let entity = box_entity();
        let requested = entity.catalog().all_flags();
        let mut scratch = CodecScratch::new();

        let mut first = ByteWriter::new();
        append_properties_with_scratch(
            &entity,
            &requested,
            64,
            &mut first,
            &CodecLimits::default(),
            &mut scratch,
        )
        .unwrap();

        let mut second = ByteWriter::new();
        append_properties(&entity, &requested, 64, &mut second, &CodecLimits::default())
            .unwrap();

        assert_eq!(first.as_slice(), second.as_slice());
    }
}
