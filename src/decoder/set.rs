use super::common::read_intset;
use super::common::utils::{read_blob, read_sequence};
use crate::types::{DecodedValue, LogicalValue, RdbResult};
use std::io::Read;

pub fn read_set<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let members = read_sequence(input, |input| read_blob(input))?;
    Ok(LogicalValue::Sequence(members).into())
}

pub fn read_set_intset<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let intset = read_blob(input)?;
    Ok(LogicalValue::Sequence(read_intset(&intset)?).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::common::intset::tests::build_intset;
    use std::io::Cursor;

    #[test]
    fn test_plain_set() {
        let input = vec![2, 1, b'x', 1, b'y'];
        let decoded = read_set(&mut Cursor::new(input)).unwrap();
        assert_eq!(
            LogicalValue::Sequence(vec![b"x".to_vec(), b"y".to_vec()]),
            decoded.value
        );
    }

    #[test]
    fn test_intset_blob() {
        let intset = build_intset(8, &[-5, 1 << 40]);
        let mut input = vec![intset.len() as u8];
        input.extend(intset);

        let decoded = read_set_intset(&mut Cursor::new(input)).unwrap();
        assert_eq!(
            LogicalValue::Sequence(vec![b"-5".to_vec(), b"1099511627776".to_vec()]),
            decoded.value
        );
    }
}
