//! Inspection and decoding helpers for propwire capture files.
//!
//! A capture file is a flat concatenation of entity records, exactly as a
//! transport would carry them. `inspect` walks the framing without touching
//! property contents (so unknown kind tags are fine); `decode` materializes
//! entities and dumps their property values.

use anyhow::{bail, Context, Result};
use bytecoder::ByteReader;
use codec::{decode_record, CodecLimits, WireLimits};
use schema::{EntityKind, PropertyId, PropertyValue};
use serde::Serialize;
use wire::skip_record;

/// Summary of one record's framing.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSummary {
    pub kind_tag: u16,
    pub kind: Option<EntityKind>,
    pub entity_id: u64,
    pub flag_count: usize,
    pub total_bytes: usize,
    pub value_bytes: usize,
}

/// Summary of a whole capture file.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub path: String,
    pub records: Vec<RecordSummary>,
    pub total_bytes: usize,
}

/// One decoded property for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedProperty {
    pub id: PropertyId,
    pub value: PropertyValue,
}

/// One fully decoded record.
#[derive(Debug, Clone, Serialize)]
pub struct DecodedEntity {
    pub kind: EntityKind,
    pub entity_id: u64,
    pub properties: Vec<DecodedProperty>,
}

/// Walks record framing and reports sizes without decoding values.
pub fn inspect_capture(path: &str, bytes: &[u8], wire_limits: &WireLimits) -> Result<InspectReport> {
    let mut reader = ByteReader::new(bytes);
    let mut records = Vec::new();
    while !reader.is_empty() {
        let before = reader.position();
        let header = skip_record(&mut reader, wire_limits)
            .with_context(|| format!("malformed record at byte {before} of {path}"))?;
        records.push(RecordSummary {
            kind_tag: header.kind_tag,
            kind: EntityKind::from_tag(header.kind_tag),
            entity_id: header.entity_id,
            flag_count: header.flags.len(),
            total_bytes: reader.position() - before,
            value_bytes: header.value_len,
        });
    }
    Ok(InspectReport {
        path: path.to_owned(),
        records,
        total_bytes: bytes.len(),
    })
}

/// Decodes every record in a capture into entity property dumps.
pub fn decode_capture(
    bytes: &[u8],
    wire_limits: &WireLimits,
    codec_limits: &CodecLimits,
) -> Result<Vec<DecodedEntity>> {
    let mut entities = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let decoded = decode_record(&bytes[offset..], wire_limits, codec_limits)
            .with_context(|| format!("malformed record at byte {offset}"))?;
        let mut properties = Vec::new();
        for raw in decoded.present.iter() {
            let Some(id) = PropertyId::from_raw(raw) else {
                continue;
            };
            if let Some(value) = decoded.entity.get(id) {
                properties.push(DecodedProperty {
                    id,
                    value: value.clone(),
                });
            }
        }
        entities.push(DecodedEntity {
            kind: decoded.entity.kind(),
            entity_id: decoded.entity.id().raw(),
            properties,
        });
        if decoded.bytes_consumed == 0 {
            bail!("decoder made no progress at byte {offset}");
        }
        offset += decoded.bytes_consumed;
    }
    Ok(entities)
}

/// Renders an inspect report as aligned text.
#[must_use]
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}: {} records, {} bytes\n",
        report.path,
        report.records.len(),
        report.total_bytes
    ));
    for (idx, record) in report.records.iter().enumerate() {
        let kind = record
            .kind
            .map_or_else(|| format!("tag {}", record.kind_tag), |kind| kind.to_string());
        out.push_str(&format!(
            "  #{idx:<3} {kind:<8} entity {:<8} {:>3} flags {:>5} bytes ({} value)\n",
            record.entity_id, record.flag_count, record.total_bytes, record.value_bytes
        ));
    }
    out
}

/// Renders decoded entities as readable text.
#[must_use]
pub fn format_decode_pretty(entities: &[DecodedEntity]) -> String {
    let mut out = String::new();
    for decoded in entities {
        out.push_str(&format!("{} entity {}\n", decoded.kind, decoded.entity_id));
        for property in &decoded.properties {
            out.push_str(&format!("  {:<18} {:?}\n", property.id.to_string(), property.value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytecoder::ByteWriter;
    use codec::encode_record;
    use entities::{Entity, EntityId, Timestamp};
    use schema::{PropertyFlags, Rgb};

    fn capture_with_box() -> Vec<u8> {
        let mut entity = Entity::new(EntityKind::Box, EntityId::new(3), Timestamp::new(5));
        entity
            .edit(
                PropertyId::Color,
                PropertyValue::Rgb(Rgb::new(1, 2, 3)),
                Timestamp::new(6),
            )
            .unwrap();
        let mut out = ByteWriter::new();
        encode_record(
            &entity,
            &entity.catalog().all_flags(),
            4096,
            &mut out,
            &WireLimits::default(),
            &CodecLimits::default(),
        )
        .unwrap();
        out.into_bytes()
    }

    #[test]
    fn inspect_reports_framing() {
        let bytes = capture_with_box();
        let report = inspect_capture("test.bin", &bytes, &WireLimits::default()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].kind, Some(EntityKind::Box));
        assert_eq!(report.records[0].entity_id, 3);
        assert_eq!(report.records[0].total_bytes, bytes.len());
    }

    #[test]
    fn inspect_tolerates_unknown_kind_tags() {
        let mut writer = ByteWriter::new();
        wire::encode_record_header(
            &wire::RecordHeader {
                kind_tag: 500,
                entity_id: 1,
                flags: PropertyFlags::new(),
                value_len: 2,
            },
            &WireLimits::default(),
            &mut writer,
        )
        .unwrap();
        writer.write_bytes(&[0, 0]);
        let bytes = writer.into_bytes();

        let report = inspect_capture("x.bin", &bytes, &WireLimits::default()).unwrap();
        assert_eq!(report.records[0].kind, None);
        assert_eq!(report.records[0].kind_tag, 500);
    }

    #[test]
    fn decode_dumps_properties() {
        let bytes = capture_with_box();
        let entities =
            decode_capture(&bytes, &WireLimits::default(), &CodecLimits::default()).unwrap();
        assert_eq!(entities.len(), 1);
        assert!(entities[0]
            .properties
            .iter()
            .any(|property| property.id == PropertyId::Color));
    }

    #[test]
    fn decode_reports_malformed_offset() {
        let bytes = capture_with_box();
        let err = decode_capture(
            &bytes[..bytes.len() - 2],
            &WireLimits::default(),
            &CodecLimits::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("byte 0"));
    }

    #[test]
    fn pretty_output_mentions_kind_and_id() {
        let bytes = capture_with_box();
        let report = inspect_capture("a.bin", &bytes, &WireLimits::default()).unwrap();
        let text = format_inspect_pretty(&report);
        assert!(text.contains("Box"));
        assert!(text.contains("entity 3"));

        let entities =
            decode_capture(&bytes, &WireLimits::default(), &CodecLimits::default()).unwrap();
        let text = format_decode_pretty(&entities);
        assert!(text.contains("Color"));
    }

    #[test]
    fn report_serializes_to_json() {
        let bytes = capture_with_box();
        let report = inspect_capture("a.bin", &bytes, &WireLimits::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["entity_id"], 3);
    }
}
