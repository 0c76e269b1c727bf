use super::common::utils::{read_blob, read_length};
use super::common::{read_ziplist_pairs, read_zipmap};
use crate::types::{DecodedValue, LogicalValue, RdbResult};
use std::io::Read;

pub fn read_hash<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let mut hash_items = read_length(input)?;
    let mut values = Vec::with_capacity(hash_items.min(1024) as usize);

    while hash_items > 0 {
        let field = read_blob(input)?;
        let val = read_blob(input)?;
        values.push((field, val));
        hash_items -= 1;
    }

    Ok(LogicalValue::PairSequence(values).into())
}

pub fn read_hash_ziplist<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let ziplist = read_blob(input)?;
    let values = read_ziplist_pairs(&ziplist, "read_hash_ziplist")?
        .iter()
        .map(|(field, value)| (field.to_vec(), value.to_vec()))
        .collect();

    Ok(LogicalValue::PairSequence(values).into())
}

pub fn read_hash_zipmap<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let zipmap = read_blob(input)?;
    Ok(LogicalValue::PairSequence(read_zipmap(&zipmap)?).into())
}
