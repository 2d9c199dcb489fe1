use bytecoder::ByteWriter;
use codec::{
    apply_record, decode_record, encode_record, AppendState, CodecLimits, WireLimits,
};
use entities::{Entity, EntityId, Timestamp};
use schema::{
    BillboardMode, EntityKind, PropertyId, PropertyValue, Quat, Rgb, Vec3, ENTITY_KINDS,
};

fn populated(kind: EntityKind, id: u64) -> Entity {
    let mut entity = Entity::new(kind, EntityId::new(id), Timestamp::new(1_000));
    let at = Timestamp::new(2_000);

    entity
        .edit(
            PropertyId::Position,
            PropertyValue::Vec3(Vec3::new(10.0, -4.5, 0.125)),
            at,
        )
        .unwrap();
    entity
        .edit(
            PropertyId::Rotation,
            PropertyValue::Quat(Quat::new(0.0, 1.0, 0.0, 0.0)),
            at,
        )
        .unwrap();
    entity
        .edit(PropertyId::Script, PropertyValue::Str("on_tick()".into()), at)
        .unwrap();

    match kind {
        EntityKind::Box | EntityKind::Sphere => {
            entity
                .edit(PropertyId::Color, PropertyValue::Rgb(Rgb::new(8, 16, 32)), at)
                .unwrap();
        }
        EntityKind::Light => {
            entity
                .edit(PropertyId::Intensity, PropertyValue::F32(2.25), at)
                .unwrap();
            entity
                .edit(PropertyId::IsSpotlight, PropertyValue::Bool(true), at)
                .unwrap();
        }
        EntityKind::Text => {
            entity
                .edit(PropertyId::Text, PropertyValue::Str("hello".into()), at)
                .unwrap();
            entity
                .edit(
                    PropertyId::BillboardMode,
                    PropertyValue::Enum(BillboardMode::Yaw as u8),
                    at,
                )
                .unwrap();
        }
        EntityKind::Model => {
            entity
                .edit(
                    PropertyId::ModelUrl,
                    PropertyValue::Str("meshes/crate.fbx".into()),
                    at,
                )
                .unwrap();
            entity
                .edit(PropertyId::AnimationPlaying, PropertyValue::Bool(true), at)
                .unwrap();
        }
    }
    entity
}

#[test]
fn every_kind_roundtrips_through_the_factory() {
    let wire_limits = WireLimits::default();
    let codec_limits = CodecLimits::default();

    for (idx, kind) in ENTITY_KINDS.iter().enumerate() {
        let source = populated(*kind, idx as u64 + 1);
        let requested = source.catalog().all_flags();

        let mut out = ByteWriter::new();
        let outcome = encode_record(
            &source,
            &requested,
            8192,
            &mut out,
            &wire_limits,
            &codec_limits,
        )
        .unwrap();
        assert_eq!(outcome.state, AppendState::Finished, "{kind} must finish");

        let bytes = out.into_bytes();
        let decoded = decode_record(&bytes, &wire_limits, &codec_limits).unwrap();
        assert_eq!(decoded.bytes_consumed, bytes.len());
        assert_eq!(decoded.entity.kind(), *kind);
        assert_eq!(decoded.entity.id(), source.id());

        for desc in source.catalog().descriptors() {
            assert_eq!(
                decoded.entity.get(desc.id),
                source.get(desc.id),
                "{kind}: property {} must roundtrip",
                desc.id
            );
        }
    }
}

#[test]
fn multi_record_stream_decodes_in_sequence() {
    let wire_limits = WireLimits::default();
    let codec_limits = CodecLimits::default();

    let mut out = ByteWriter::new();
    for (idx, kind) in ENTITY_KINDS.iter().enumerate() {
        let source = populated(*kind, idx as u64 + 1);
        encode_record(
            &source,
            &source.catalog().all_flags(),
            8192,
            &mut out,
            &wire_limits,
            &codec_limits,
        )
        .unwrap();
    }

    let bytes = out.into_bytes();
    let mut offset = 0;
    let mut seen = 0;
    while offset < bytes.len() {
        let decoded = decode_record(&bytes[offset..], &wire_limits, &codec_limits).unwrap();
        assert_eq!(decoded.entity.id(), EntityId::new(seen + 1));
        offset += decoded.bytes_consumed;
        seen += 1;
    }
    assert_eq!(seen as usize, ENTITY_KINDS.len());
    assert_eq!(offset, bytes.len());
}

#[test]
fn reordered_packets_keep_newest_state() {
    let wire_limits = WireLimits::default();
    let codec_limits = CodecLimits::default();

    let mut source = populated(EntityKind::Box, 5);
    let requested = source.catalog().all_flags();

    let mut old_packet = ByteWriter::new();
    encode_record(
        &source,
        &requested,
        8192,
        &mut old_packet,
        &wire_limits,
        &codec_limits,
    )
    .unwrap();

    source
        .edit(
            PropertyId::Color,
            PropertyValue::Rgb(Rgb::new(250, 0, 0)),
            Timestamp::new(9_000),
        )
        .unwrap();
    let mut new_packet = ByteWriter::new();
    encode_record(
        &source,
        &requested,
        8192,
        &mut new_packet,
        &wire_limits,
        &codec_limits,
    )
    .unwrap();

    // The newer packet arrives first; the older one must not clobber it.
    let mut target = Entity::new(EntityKind::Box, EntityId::new(5), Timestamp::ZERO);
    let fresh = apply_record(&mut target, new_packet.as_slice(), &wire_limits, &codec_limits)
        .unwrap();
    assert!(fresh.applied);
    let late = apply_record(&mut target, old_packet.as_slice(), &wire_limits, &codec_limits)
        .unwrap();
    assert!(!late.applied, "out-of-order packet must be rejected");

    assert_eq!(
        target.get(PropertyId::Color),
        Some(&PropertyValue::Rgb(Rgb::new(250, 0, 0)))
    );
    assert_eq!(target.last_edited(), Timestamp::new(9_000));
}
