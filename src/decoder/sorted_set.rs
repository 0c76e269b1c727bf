use super::common::utils::{read_blob, read_exact, read_length};
use super::common::{read_ziplist_pairs, ZiplistEntry};
use crate::constants::{score, version};
use crate::types::{DecodedValue, LogicalValue, RdbError, RdbResult};
use byteorder::ReadBytesExt;
use std::io::Read;
use std::str;

/// Scores are handed out as text; `f64`'s `Display` gives the shortest form
/// that parses back to the same value (`1.5`, `2`, `inf`, `NaN`).
pub fn render_score(score: f64) -> Vec<u8> {
    score.to_string().into_bytes()
}

fn parse_score(text: &[u8], context: &'static str) -> RdbResult<f64> {
    str::from_utf8(text)
        .ok()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or_else(|| {
            RdbError::container(
                context,
                format!("invalid score {:?}", String::from_utf8_lossy(text)),
            )
        })
}

pub(crate) fn read_score<R: Read>(input: &mut R) -> RdbResult<f64> {
    let score_length = input.read_u8()?;
    match score_length {
        score::NAN => Ok(f64::NAN),
        score::POS_INF => Ok(f64::INFINITY),
        score::NEG_INF => Ok(f64::NEG_INFINITY),
        _ => {
            let text = read_exact(input, score_length as usize)?;
            parse_score(&text, "read_sorted_set")
        }
    }
}

pub fn read_sorted_set<R: Read>(input: &mut R) -> RdbResult<DecodedValue> {
    let mut set_items = read_length(input)?;
    let mut values = Vec::with_capacity(set_items.min(1024) as usize);

    while set_items > 0 {
        let member = read_blob(input)?;
        let score = read_score(input)?;
        values.push((member, render_score(score)));
        set_items -= 1;
    }

    Ok(LogicalValue::PairSequence(values).into())
}

pub fn read_sorted_set_ziplist<R: Read>(input: &mut R, rdb_version: u32) -> RdbResult<DecodedValue> {
    let ziplist = read_blob(input)?;
    let pairs = read_ziplist_pairs(&ziplist, "read_sorted_set_ziplist")?;

    let mut values = Vec::with_capacity(pairs.len());
    for (member, score) in pairs {
        let score = match score {
            ZiplistEntry::String(text) => parse_score(text, "read_sorted_set_ziplist")?,
            ZiplistEntry::Number(number) => number as f64,
        };
        values.push((member.to_vec(), render_score(score)));
    }

    let value = LogicalValue::PairSequence(values);
    // Old writers counted ziplist entries rather than members.
    let reported_len = if rdb_version < version::ZSET_COUNT_QUIRK_BELOW {
        value.len() * 2
    } else {
        value.len()
    };

    Ok(DecodedValue {
        value,
        reported_len,
    })
}
