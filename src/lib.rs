//! rdbscan - a streaming decoder for Redis RDB snapshot files
//!
//! The parser reads a dump front to back and hands every key to a
//! [`Consumer`] as a [`Record`], with its value normalized to one of three
//! shapes no matter how it was encoded on disk. Format versions 1 to 6 are
//! supported, including the compact ziplist, zipmap and intset encodings and
//! LZF compressed strings. For versions 5 and up the trailing CRC-64 is
//! verified.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use rdbscan::{filter, Flow, Record};
//!
//! let file = File::open("dump.rdb").unwrap();
//! let reader = BufReader::new(file);
//!
//! let outcome = rdbscan::parse(reader, filter::Simple::new(), &mut |record: &Record<'_>| {
//!     println!("db{} {}: {:?}", record.db, record.kind, record.value);
//!     Flow::Continue
//! });
//! ```
//!
//! Keys and values are borrowed for the duration of the callback only.

pub mod constants;
pub mod decoder;
pub mod filter;
pub mod formatter;
pub mod types;

use std::io::Read;

pub use decoder::{render_score, Consumer, RdbParser};
pub use filter::Filter;
pub use types::{
    Checksum, DecodedValue, Flow, LogicalValue, Outcome, ParseError, ParseStats, RdbError,
    RdbOk, RdbResult, Record, Type, ValueType,
};

/// Decodes a whole dump into `consumer`.
///
/// Use [`RdbParser`] directly to get at the statistics afterwards.
pub fn parse<R, F, C>(reader: R, filter: F, consumer: &mut C) -> Result<Outcome, ParseError>
where
    R: Read,
    F: Filter,
    C: Consumer + ?Sized,
{
    RdbParser::new(reader, filter).parse(consumer)
}
