use bytecoder::{ByteReader, ByteWriter};
use proptest::prelude::*;
use schema::PropertyFlags;
use wire::{decode_record_header, encode_record_header, skip_record, Limits, RecordHeader};

fn arbitrary_header() -> impl Strategy<Value = RecordHeader> {
    (
        1u16..=64,
        any::<u64>(),
        prop::collection::btree_set(0u16..200, 0..16),
        0usize..512,
    )
        .prop_map(|(kind_tag, entity_id, bits, value_len)| {
            let mut flags = PropertyFlags::new();
            for bit in bits {
                flags.set_raw(bit);
            }
            RecordHeader {
                kind_tag,
                entity_id,
                flags,
                value_len,
            }
        })
}

proptest! {
    #[test]
    fn prop_header_roundtrip(header in arbitrary_header()) {
        let limits = Limits::default();
        let mut writer = ByteWriter::new();
        encode_record_header(&header, &limits, &mut writer).unwrap();
        let bytes = writer.into_bytes();
        prop_assert_eq!(bytes.len(), header.encoded_len());

        let mut reader = ByteReader::new(&bytes);
        let decoded = decode_record_header(&mut reader, &limits).unwrap();
        prop_assert_eq!(decoded, header);
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_skip_lands_on_next_record(
        first in arbitrary_header(),
        second in arbitrary_header(),
    ) {
        let limits = Limits::default();
        let mut writer = ByteWriter::new();
        encode_record_header(&first, &limits, &mut writer).unwrap();
        writer.write_bytes(&vec![0xEE; first.value_len]);
        encode_record_header(&second, &limits, &mut writer).unwrap();
        writer.write_bytes(&vec![0xDD; second.value_len]);

        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        skip_record(&mut reader, &limits).unwrap();
        let decoded = decode_record_header(&mut reader, &limits).unwrap();
        prop_assert_eq!(decoded, second);
    }

    #[test]
    fn prop_truncation_never_panics(header in arbitrary_header(), cut in 0usize..64) {
        let limits = Limits::default();
        let mut writer = ByteWriter::new();
        encode_record_header(&header, &limits, &mut writer).unwrap();
        let bytes = writer.into_bytes();
        let cut = cut.min(bytes.len().saturating_sub(1));

        let mut reader = ByteReader::new(&bytes[..cut]);
        prop_assert!(decode_record_header(&mut reader, &limits).is_err());
    }
}
