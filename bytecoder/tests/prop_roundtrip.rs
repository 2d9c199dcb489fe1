use bytecoder::{ByteReader, ByteWriter};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    F32(f32),
    Counted(u64),
    Raw(Vec<u8>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<f32>().prop_map(Op::F32),
        any::<u64>().prop_map(Op::Counted),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Op::Raw),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let mut writer = ByteWriter::new();
        for op in &ops {
            match op {
                Op::U8(v) => writer.write_u8(*v),
                Op::F32(v) => writer.write_f32(*v),
                Op::Counted(v) => writer.write_counted_u64(*v),
                Op::Raw(v) => writer.write_bytes(v),
            }
        }

        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(reader.read_u8().unwrap(), *v),
                Op::F32(v) => {
                    let decoded = reader.read_f32().unwrap();
                    prop_assert_eq!(decoded.to_bits(), v.to_bits());
                }
                Op::Counted(v) => prop_assert_eq!(reader.read_counted_u64().unwrap(), *v),
                Op::Raw(v) => prop_assert_eq!(reader.read_bytes(v.len()).unwrap(), v.as_slice()),
            }
        }
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn prop_counted_is_minimal(value in any::<u64>()) {
        let mut writer = ByteWriter::new();
        writer.write_counted_u64(value);
        let bytes = writer.into_bytes();

        // Count byte is minimal: the top payload byte is never zero.
        let count = bytes[0] as usize;
        prop_assert_eq!(bytes.len(), 1 + count);
        if count > 0 {
            prop_assert_ne!(bytes[count], 0);
        }
    }

    #[test]
    fn prop_truncation_never_panics(value in any::<u64>(), cut in 0usize..9) {
        let mut writer = ByteWriter::new();
        writer.write_counted_u64(value);
        let bytes = writer.into_bytes();
        let cut = cut.min(bytes.len());

        let mut reader = ByteReader::new(&bytes[..cut]);
        // Either decodes to the original value or errors; never panics.
        if let Ok(decoded) = reader.read_counted_u64() {
            prop_assert_eq!(decoded, value);
        }
    }
}
