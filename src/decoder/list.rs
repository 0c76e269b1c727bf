use super::common::read_ziplist_flat;
use super::common::utils::{read_blob, read_sequence};
use crate::types::{DecodedValue, LogicalValue, RdbResult};
use std::io::Read;

pub fn read_linked_list<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let values = read_sequence(input, |input| read_blob(input))?;
    Ok(LogicalValue::Sequence(values).into())
}

pub fn read_list_ziplist<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let ziplist = read_blob(input)?;
    let values = read_ziplist_flat(&ziplist, "read_list_ziplist")?;
    Ok(LogicalValue::Sequence(values).into())
}
