//! Per-kind property value encoding and decoding.
//!
//! The appender and the reader both dispatch through this module, so byte
//! widths, endianness, and enum mappings cannot diverge between them. Any
//! divergence would desynchronize every subsequent property in the stream.

use bytecoder::{ByteReader, ByteWriter};
use schema::{PropertyDescriptor, PropertyKind, PropertyValue, Quat, Rgb, Vec3};

use crate::error::{CodecError, CodecResult};
use crate::limits::CodecLimits;

pub(crate) fn write_property_value(
    desc: &PropertyDescriptor,
    value: &PropertyValue,
    limits: &CodecLimits,
    writer: &mut ByteWriter,
) -> CodecResult<()> {
    match (desc.kind, value) {
        (PropertyKind::Bool, PropertyValue::Bool(v)) => {
            writer.write_u8(u8::from(*v));
        }
        (PropertyKind::F32, PropertyValue::F32(v)) => {
            writer.write_f32(*v);
        }
        (PropertyKind::Timestamp, PropertyValue::Timestamp(v)) => {
            writer.write_counted_u64(*v);
        }
        (PropertyKind::Vec3, PropertyValue::Vec3(v)) => {
            write_vec3(*v, writer);
        }
        (PropertyKind::Quat, PropertyValue::Quat(v)) => {
            writer.write_f32(v.x);
            writer.write_f32(v.y);
            writer.write_f32(v.z);
            writer.write_f32(v.w);
        }
        (PropertyKind::Rgb, PropertyValue::Rgb(v)) => {
            writer.write_u8(v.r);
            writer.write_u8(v.g);
            writer.write_u8(v.b);
        }
        (PropertyKind::Str, PropertyValue::Str(v)) => {
            if v.len() > limits.max_string_bytes {
                return Err(CodecError::StringTooLong {
                    id: desc.id,
                    len: v.len(),
                    max: limits.max_string_bytes,
                });
            }
            writer.write_counted_u64(v.len() as u64);
            writer.write_bytes(v.as_bytes());
        }
        (PropertyKind::Enum { count }, PropertyValue::Enum(raw)) => {
            if *raw >= count {
                return Err(CodecError::EnumOutOfRange {
                    id: desc.id,
                    raw: *raw,
                    count,
                });
            }
            writer.write_u8(*raw);
        }
        _ => {
            return Err(CodecError::TypeMismatch {
                id: desc.id,
                expected: kind_label(desc.kind),
                found: value.kind_name(),
            });
        }
    }
    Ok(())
}

pub(crate) fn read_property_value(
    desc: &PropertyDescriptor,
    reader: &mut ByteReader<'_>,
    limits: &CodecLimits,
) -> CodecResult<PropertyValue> {
    let value = match desc.kind {
        PropertyKind::Bool => PropertyValue::Bool(reader.read_u8()? != 0),
        PropertyKind::F32 => PropertyValue::F32(reader.read_f32()?),
        PropertyKind::Timestamp => PropertyValue::Timestamp(reader.read_counted_u64()?),
        PropertyKind::Vec3 => PropertyValue::Vec3(read_vec3(reader)?),
        PropertyKind::Quat => PropertyValue::Quat(Quat::new(
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
            reader.read_f32()?,
        )),
        PropertyKind::Rgb => PropertyValue::Rgb(Rgb::new(
            reader.read_u8()?,
            reader.read_u8()?,
            reader.read_u8()?,
        )),
        PropertyKind::Str => {
            let len = reader.read_counted_u64()?;
            if len > limits.max_string_bytes as u64 {
                return Err(CodecError::StringTooLong {
                    id: desc.id,
                    len: len as usize,
                    max: limits.max_string_bytes,
                });
            }
            let bytes = reader.read_bytes(len as usize)?;
            let text = std::str::from_utf8(bytes)
                .map_err(|_| CodecError::InvalidUtf8 { id: desc.id })?;
            PropertyValue::Str(text.to_owned())
        }
        PropertyKind::Enum { count } => {
            let raw = reader.read_u8()?;
            if raw >= count {
                return Err(CodecError::EnumOutOfRange {
                    id: desc.id,
                    raw,
                    count,
                });
            }
            PropertyValue::Enum(raw)
        }
    };
    Ok(value)
}

fn write_vec3(v: Vec3, writer: &mut ByteWriter) {
    writer.write_f32(v.x);
    writer.write_f32(v.y);
    writer.write_f32(v.z);
}

fn read_vec3(reader: &mut ByteReader<'_>) -> CodecResult<Vec3> {
    Ok(Vec3::new(
        reader.read_f32()?,
        reader.read_f32()?,
        reader.read_f32()?,
    ))
}

pub(crate) const fn kind_label(kind: PropertyKind) -> &'static str {
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
