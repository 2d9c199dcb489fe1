//! Record header encoding, decoding, and skip support.

use bytecoder::{counted_len, ByteReader, ByteWriter};
use schema::PropertyFlags;

use crate::error::{DecodeError, EncodeError, WireResult};
use crate::limits::Limits;

/// The framing of one entity record.
///
/// `kind_tag` stays raw so framing can be parsed (and skipped) even when the
/// tag is unknown to the local catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    /// Raw entity kind tag.
    pub kind_tag: u16,
    /// Raw entity identifier.
    pub entity_id: u64,
    /// Properties present in the value region.
    pub flags: PropertyFlags,
    /// Length of the value region in bytes.
    pub value_len: usize,
}

impl RecordHeader {
    /// Returns the encoded size of this header in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        counted_len(u64::from(self.kind_tag))
            + counted_len(self.entity_id)
            + self.flags.encoded_len()
            + counted_len(self.value_len as u64)
    }
}

/// Encodes a record header into the writer.
///
/// # Errors
///
/// Returns [`EncodeError`] when the flag set or value region exceeds the
/// limits; nothing is written in that case.
pub fn encode_record_header(
    header: &RecordHeader,
    limits: &Limits,
    writer: &mut ByteWriter,
) -> Result<(), EncodeError> {
    let bits = header.flags.significant_bits();
    if bits > limits.max_flag_bits {
        return Err(EncodeError::FlagBitsTooLarge {
            bits,
            max: limits.max_flag_bits,
        });
    }
    if header.value_len > limits.max_value_bytes {
        return Err(EncodeError::ValueRegionTooLarge {
            len: header.value_len,
            max: limits.max_value_bytes,
        });
    }

    writer.write_counted_u64(u64::from(header.kind_tag));
    writer.write_counted_u64(header.entity_id);
    header.flags.write_to(writer);
    writer.write_counted_u64(header.value_len as u64);
    Ok(())
}

/// Decodes a record header, leaving the reader at the value region.
pub fn decode_record_header(
    reader: &mut ByteReader<'_>,
    limits: &Limits,
) -> WireResult<RecordHeader> {
    let tag = reader.read_counted_u64()?;
    let kind_tag =
        u16::try_from(tag).map_err(|_| DecodeError::KindTagOutOfRange { tag })?;
    let entity_id = reader.read_counted_u64()?;
    let flags = PropertyFlags::read_from(reader, limits.max_flag_bits)?;
    let value_len = reader.read_counted_u64()?;
    if value_len > limits.max_value_bytes as u64 {
        return Err(DecodeError::ValueRegionTooLarge {
            len: value_len,
            max: limits.max_value_bytes,
        });
    }
    Ok(RecordHeader {
        kind_tag,
        entity_id,
        flags,
        value_len: value_len as usize,
    })
}

/// Steps over one complete record without interpreting its value bytes.
///
/// Returns the parsed header. The reader ends positioned at the next record
/// (or the end of the buffer).
pub fn skip_record(reader: &mut ByteReader<'_>, limits: &Limits) -> WireResult<RecordHeader> {
    let header = decode_record_header(reader, limits)?;
    reader.skip(header.value_len)?;
    Ok(header)
}
