use super::common::utils::{read_blob, read_length, skip_blob};
use super::{hash, list, set, sorted_set};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use std::io::Read;

use crate::constants::{op_code, version};
use crate::types::{DecodedValue, LogicalValue, RdbOk, RdbResult, ValueType};

pub(crate) struct DecoderState {
    pub version: u32,
    pub last_expiretime: Option<u64>,
    pub current_database: u32,
}

impl DecoderState {
    pub fn new(version: u32) -> DecoderState {
        DecoderState {
            version,
            last_expiretime: None,
            current_database: 0,
        }
    }
}

/// What the next opcode in the stream turned out to be. For a key the value
/// has not been read yet, so the caller can still decide to skip it.
#[derive(Debug, PartialEq)]
pub(crate) enum Operation {
    SelectDb(u32),
    Key {
        value_type: ValueType,
        key: Vec<u8>,
        expiry: Option<u64>,
    },
    Eof,
}

pub(crate) fn read_type<R: Read>(
    input: &mut R,
    value_type: ValueType,
    rdb_version: u32,
) -> RdbResult<DecodedValue> {
    match value_type {
        ValueType::String => Ok(LogicalValue::Scalar(read_blob(input)?).into()),
        ValueType::List => list::read_linked_list(input),
        ValueType::Set => set::read_set(input),
        ValueType::SortedSet => sorted_set::read_sorted_set(input),
        ValueType::Hash => hash::read_hash(input),
        ValueType::HashZipmap => hash::read_hash_zipmap(input),
        ValueType::ListZiplist => list::read_list_ziplist(input),
        ValueType::SetIntset => set::read_set_intset(input),
        ValueType::SortedSetZiplist => sorted_set::read_sorted_set_ziplist(input, rdb_version),
        ValueType::HashZiplist => hash::read_hash_ziplist(input),
    }
}

/// Consumes a value without decoding it. Compressed strings are not inflated
/// and container buffers are not scanned.
pub(crate) fn skip_object<R: Read>(input: &mut R, value_type: ValueType) -> RdbOk {
    match value_type {
        ValueType::String
        | ValueType::HashZipmap
        | ValueType::ListZiplist
        | ValueType::SetIntset
        | ValueType::SortedSetZiplist
        | ValueType::HashZiplist => skip_blob(input),
        ValueType::List | ValueType::Set => {
            for _ in 0..read_length(input)? {
                skip_blob(input)?;
            }
            Ok(())
        }
        ValueType::Hash => {
            for _ in 0..read_length(input)? {
                skip_blob(input)?;
                skip_blob(input)?;
            }
            Ok(())
        }
        ValueType::SortedSet => {
            for _ in 0..read_length(input)? {
                skip_blob(input)?;
                sorted_set::read_score(input)?;
            }
            Ok(())
        }
    }
}

/// Reads opcodes up to and including the next database switch, key header or
/// end marker. Expire opcodes are folded into the key that follows them.
pub(crate) fn read_next_operation<R: Read>(
    input: &mut R,
    state: &mut DecoderState,
) -> RdbResult<Operation> {
    loop {
        match input.read_u8()? {
            op_code::SELECTDB => {
                state.current_database = read_length(input)?;
                debug!("Selecting database {}", state.current_database);
                return Ok(Operation::SelectDb(state.current_database));
            }
            op_code::EOF => return Ok(Operation::Eof),
            op_code::EXPIRETIME_MS if state.version >= version::EXPIRETIME_MS => {
                state.last_expiretime = Some(input.read_u64::<LittleEndian>()?);
            }
            op_code::EXPIRETIME => {
                state.last_expiretime = Some(u64::from(input.read_u32::<LittleEndian>()?) * 1000);
            }
            enc_type => {
                let value_type = ValueType::from_u8(enc_type)?;
                let key = read_blob(input)?;
                return Ok(Operation::Key {
                    value_type,
                    key,
                    expiry: state.last_expiretime.take(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RdbError;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn next(input: &[u8], rdb_version: u32) -> RdbResult<Operation> {
        let mut state = DecoderState::new(rdb_version);
        read_next_operation(&mut Cursor::new(input), &mut state)
    }

    #[test]
    fn test_select_db() {
        assert_eq!(Operation::SelectDb(3), next(&[0xFE, 0x03], 6).unwrap());
        assert_eq!(Operation::SelectDb(300), next(&[0xFE, 0x41, 0x2C], 6).unwrap());
    }

    #[test]
    fn test_seconds_expire_is_little_endian() {
        let mut input = vec![0xFD];
        input.extend_from_slice(&1_500_000_000u32.to_le_bytes());
        input.extend_from_slice(&[0x00, 0x01, b'k']);

        assert_eq!(
            Operation::Key {
                value_type: ValueType::String,
                key: b"k".to_vec(),
                expiry: Some(1_500_000_000_000),
            },
            next(&input, 2).unwrap()
        );
    }

    #[rstest]
    #[case(3)]
    #[case(6)]
    fn test_millisecond_expire(#[case] rdb_version: u32) {
        let mut input = vec![0xFC];
        input.extend_from_slice(&1_671_963_072_573u64.to_le_bytes());
        input.extend_from_slice(&[0x0B, 0x01, b's']);

        assert_eq!(
            Operation::Key {
                value_type: ValueType::SetIntset,
                key: b"s".to_vec(),
                expiry: Some(1_671_963_072_573),
            },
            next(&input, rdb_version).unwrap()
        );
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    fn test_millisecond_expire_before_version_3(#[case] rdb_version: u32) {
        let mut input = vec![0xFC];
        input.extend_from_slice(&0u64.to_le_bytes());
        assert!(matches!(
            next(&input, rdb_version),
            Err(RdbError::UnknownValueType(252))
        ));
    }

    #[test]
    fn test_expiry_applies_to_one_key() {
        let mut input = vec![0xFD];
        input.extend_from_slice(&10u32.to_le_bytes());
        input.extend_from_slice(&[0x00, 0x01, b'a', 0x00, 0x01, b'b']);

        let mut reader = Cursor::new(input);
        let mut state = DecoderState::new(6);
        let first = read_next_operation(&mut reader, &mut state).unwrap();
        assert!(matches!(first, Operation::Key { expiry: Some(10_000), .. }));
        read_type(&mut reader, ValueType::String, 6).unwrap();
        let second = read_next_operation(&mut reader, &mut state).unwrap();
        assert!(matches!(second, Operation::Key { expiry: None, .. }));
    }

    #[rstest]
    #[case(5)]
    #[case(7)]
    #[case(14)]
    #[case(200)]
    fn test_unknown_value_type(#[case] tag: u8) {
        assert!(matches!(
            next(&[tag, 0x01, b'k'], 6),
            Err(RdbError::UnknownValueType(t)) if t == tag
        ));
    }

    #[test]
    fn test_eof() {
        assert_eq!(Operation::Eof, next(&[0xFF], 6).unwrap());
        assert!(matches!(next(&[], 6), Err(RdbError::TruncatedStream)));
    }

    #[rstest]
    #[case(ValueType::String, vec![0x03, b'a', b'b', b'c'])]
    #[case(ValueType::String, vec![0xC3, 0x02, 0x05, 0x01, 0x02])]
    #[case(ValueType::List, vec![0x02, 0x01, b'a', 0xC1, 0x01, 0x00])]
    #[case(ValueType::Hash, vec![0x01, 0x01, b'f', 0x01, b'v'])]
    #[case(ValueType::SortedSet, vec![0x02, 0x01, b'a', 0x01, b'1', 0x01, b'b', 0xFE])]
    #[case(ValueType::SetIntset, vec![0x04, 0x02, 0x00, 0x00, 0x00])]
    fn test_skip_object_consumes_value(#[case] value_type: ValueType, #[case] mut body: Vec<u8>) {
        body.push(0xFF);
        let mut reader = Cursor::new(body);
        skip_object(&mut reader, value_type).unwrap();
        assert_eq!(0xFF, reader.read_u8().unwrap());
    }
}
