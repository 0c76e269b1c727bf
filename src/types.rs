use std::fmt;
use std::io;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::encoding_type;

#[derive(Error, Debug)]
pub enum RdbError {
    #[error("IO error: {0}")]
    Io(#[source] io::Error),
    #[error("Malformed header: {0}")]
    MalformedHeader(&'static str),
    #[error("Unsupported RDB version: {0}")]
    UnsupportedVersion(u32),
    #[error("Stream ended before the record was complete")]
    TruncatedStream,
    #[error("Bad length encoding in {context}: {value}")]
    BadLengthEncoding { context: &'static str, value: u32 },
    #[error("Bad compressed payload: {0}")]
    BadCompressedPayload(String),
    #[error("Bad container encoding in {context}: {message}")]
    BadContainerEncoding {
        context: &'static str,
        message: String,
    },
    #[error("Unknown value type: {0}")]
    UnknownValueType(u8),
    #[error("Checksum mismatch: expected {expected:016x}, computed {actual:016x}")]
    ChecksumMismatch { expected: u64, actual: u64 },
}

impl RdbError {
    pub(crate) fn container(context: &'static str, message: impl Into<String>) -> RdbError {
        RdbError::BadContainerEncoding {
            context,
            message: message.into(),
        }
    }
}

impl From<io::Error> for RdbError {
    fn from(err: io::Error) -> RdbError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            RdbError::TruncatedStream
        } else {
            RdbError::Io(err)
        }
    }
}

pub type RdbResult<T> = Result<T, RdbError>;

pub type RdbOk = RdbResult<()>;

/// A decode failure together with the stream offset it was detected at.
#[derive(Error, Debug)]
#[error("{kind} (at byte offset {offset})")]
pub struct ParseError {
    pub offset: u64,
    #[source]
    pub kind: RdbError,
}

/// Logical kind of a value, independent of how it was encoded on disk.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Type {
    String,
    List,
    Set,
    SortedSet,
    Hash,
}

impl Type {
    pub const ALL: [Type; 5] = [
        Type::String,
        Type::List,
        Type::Set,
        Type::SortedSet,
        Type::Hash,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Type::String => "string",
            Type::List => "list",
            Type::Set => "set",
            Type::SortedSet => "sortedset",
            Type::Hash => "hash",
        }
    }

    fn index(&self) -> usize {
        match self {
            Type::String => 0,
            Type::List => 1,
            Type::Set => 2,
            Type::SortedSet => 3,
            Type::Hash => 4,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = String;

    fn from_str(s: &str) -> Result<Type, String> {
        Type::ALL
            .iter()
            .copied()
            .find(|typ| typ.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Type::ALL.iter().map(Type::name).collect();
                format!("unknown type '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// The on-disk value type tag that follows the record opcodes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValueType {
    String,
    List,
    Set,
    SortedSet,
    Hash,
    HashZipmap,
    ListZiplist,
    SetIntset,
    SortedSetZiplist,
    HashZiplist,
}

impl ValueType {
    pub fn from_u8(enc_type: u8) -> RdbResult<ValueType> {
        match enc_type {
            encoding_type::STRING => Ok(ValueType::String),
            encoding_type::LIST => Ok(ValueType::List),
            encoding_type::SET => Ok(ValueType::Set),
            encoding_type::ZSET => Ok(ValueType::SortedSet),
            encoding_type::HASH => Ok(ValueType::Hash),
            encoding_type::HASH_ZIPMAP => Ok(ValueType::HashZipmap),
            encoding_type::LIST_ZIPLIST => Ok(ValueType::ListZiplist),
            encoding_type::SET_INTSET => Ok(ValueType::SetIntset),
            encoding_type::ZSET_ZIPLIST => Ok(ValueType::SortedSetZiplist),
            encoding_type::HASH_ZIPLIST => Ok(ValueType::HashZiplist),
            _ => Err(RdbError::UnknownValueType(enc_type)),
        }
    }

    pub fn kind(&self) -> Type {
        match self {
            ValueType::String => Type::String,
            ValueType::List | ValueType::ListZiplist => Type::List,
            ValueType::Set | ValueType::SetIntset => Type::Set,
            ValueType::SortedSet | ValueType::SortedSetZiplist => Type::SortedSet,
            ValueType::Hash | ValueType::HashZipmap | ValueType::HashZiplist => Type::Hash,
        }
    }
}

/// A decoded value, normalized over all of its possible encodings.
#[derive(Debug, PartialEq, Clone)]
pub enum LogicalValue {
    Scalar(Vec<u8>),
    /// Lists and sets, in stored order.
    Sequence(Vec<Vec<u8>>),
    /// Hashes as (field, value) and sorted sets as (member, score) with the score
    /// rendered as decimal text.
    PairSequence(Vec<(Vec<u8>, Vec<u8>)>),
}

impl LogicalValue {
    /// Number of logical elements: bytes for a scalar, items or pairs otherwise.
    pub fn len(&self) -> usize {
        match self {
            LogicalValue::Scalar(value) => value.len(),
            LogicalValue::Sequence(values) => values.len(),
            LogicalValue::PairSequence(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A decoded value plus the element count the decoder reports for it.
#[derive(Debug, PartialEq, Clone)]
pub struct DecodedValue {
    pub value: LogicalValue,
    pub reported_len: usize,
}

impl From<LogicalValue> for DecodedValue {
    fn from(value: LogicalValue) -> DecodedValue {
        let reported_len = value.len();
        DecodedValue {
            value,
            reported_len,
        }
    }
}

/// One key handed to a consumer.
///
/// `key` and `value` borrow buffers owned by the parser and are only valid for
/// the duration of the callback. Copy anything that must outlive it.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Record<'a> {
    pub db: u32,
    pub kind: Type,
    pub encoding: ValueType,
    pub key: &'a [u8],
    pub value: &'a LogicalValue,
    /// Absolute expire time in milliseconds since the Unix epoch.
    pub expiry: Option<u64>,
    /// Element count as reported by the decoder. Equals `value.len()` except for
    /// ziplist sorted sets in format versions below 2, where it is doubled.
    pub reported_len: usize,
}

/// Returned by a consumer after every record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Flow {
    Continue,
    Abort,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Checksum {
    /// The format version predates checksums.
    Absent,
    /// The writer stored a zero trailer, meaning checksums were turned off.
    Disabled,
    Verified(u64),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    Completed { version: u32, checksum: Checksum },
    /// The consumer asked to stop; the trailer was not read.
    Aborted { version: u32 },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParseStats {
    pub total_bytes: Option<u64>,
    pub consumed_bytes: u64,
    pub skipped: u64,
    pub elapsed: Option<Duration>,
    records: [u64; 5],
}

impl ParseStats {
    pub fn records(&self, typ: Type) -> u64 {
        self.records[typ.index()]
    }

    pub fn total_records(&self) -> u64 {
        self.records.iter().sum()
    }

    pub(crate) fn count(&mut self, typ: Type) {
        self.records[typ.index()] += 1;
    }
}
