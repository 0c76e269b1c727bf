mod checksum;
pub(crate) mod common;
mod hash;
mod list;
mod rdb;
mod set;
mod sorted_set;

use std::io::Read;
use std::time::Instant;

use log::{debug, trace, warn};

use self::checksum::ChecksumReader;
use self::rdb::{DecoderState, Operation};
use crate::constants::version;
use crate::filter::Filter;
use crate::types::{
    Checksum, Flow, Outcome, ParseError, ParseStats, RdbError, RdbResult, Record,
};

pub use self::sorted_set::render_score;

/// Receives the decoded contents of a dump.
///
/// Only `record` is required. Any `FnMut(&Record) -> Flow` closure is a
/// consumer as well.
#[allow(unused_variables)]
pub trait Consumer {
    fn start_rdb(&mut self, version: u32) {}
    fn start_database(&mut self, db: u32) {}
    fn record(&mut self, record: &Record<'_>) -> Flow;
    fn end_database(&mut self, db: u32) {}
    /// Called once the last record was delivered, also after an abort.
    fn end_rdb(&mut self) {}
}

impl<T> Consumer for T
where
    T: FnMut(&Record<'_>) -> Flow,
{
    fn record(&mut self, record: &Record<'_>) -> Flow {
        self(record)
    }
}

/// Streams one dump into a [`Consumer`].
///
/// A parser reads its input once; statistics stay available afterwards no
/// matter how the parse ended.
pub struct RdbParser<R: Read, F: Filter> {
    reader: ChecksumReader<R>,
    filter: F,
    stats: ParseStats,
}

impl<R: Read, F: Filter> RdbParser<R, F> {
    pub fn new(reader: R, filter: F) -> RdbParser<R, F> {
        RdbParser {
            reader: ChecksumReader::new(reader),
            filter,
            stats: ParseStats::default(),
        }
    }

    /// Total input size, if known, reported in the statistics.
    pub fn with_total_bytes(mut self, total: u64) -> RdbParser<R, F> {
        self.stats.total_bytes = Some(total);
        self
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    pub fn parse<C: Consumer + ?Sized>(&mut self, consumer: &mut C) -> Result<Outcome, ParseError> {
        let started = Instant::now();
        let result = self.run(consumer);

        self.stats.consumed_bytes = self.reader.position();
        self.stats.elapsed = Some(started.elapsed());

        result.map_err(|kind| ParseError {
            offset: self.reader.position(),
            kind,
        })
    }

    fn run<C: Consumer + ?Sized>(&mut self, consumer: &mut C) -> RdbResult<Outcome> {
        let rdb_version = common::utils::verify_header(&mut self.reader)?;
        debug!("RDB format version {}", rdb_version);

        let mut state = DecoderState::new(rdb_version);
        let mut open_database: Option<u32> = None;
        consumer.start_rdb(rdb_version);

        loop {
            match rdb::read_next_operation(&mut self.reader, &mut state)? {
                Operation::SelectDb(db) => {
                    if let Some(previous) = open_database.take() {
                        consumer.end_database(previous);
                    }
                    if self.filter.matches_db(db) {
                        consumer.start_database(db);
                        open_database = Some(db);
                    }
                }
                Operation::Eof => break,
                Operation::Key {
                    value_type,
                    key,
                    expiry,
                } => {
                    let db = state.current_database;
                    let kind = value_type.kind();
                    if !self.filter.matches_db(db)
                        || !self.filter.matches_type(kind)
                        || !self.filter.matches_key(&key)
                    {
                        debug!("Skipping {} key {:?}", kind, String::from_utf8_lossy(&key));
                        rdb::skip_object(&mut self.reader, value_type)?;
                        self.stats.skipped += 1;
                        continue;
                    }

                    // Keys stored before any SELECTDB belong to db 0
                    if open_database.is_none() {
                        consumer.start_database(db);
                        open_database = Some(db);
                    }

                    let decoded = rdb::read_type(&mut self.reader, value_type, rdb_version)?;
                    self.stats.count(kind);
                    if self.stats.total_records() % 1000 == 0 {
                        trace!(
                            "{} records decoded, {} bytes consumed",
                            self.stats.total_records(),
                            self.reader.position()
                        );
                    }

                    let record = Record {
                        db,
                        kind,
                        encoding: value_type,
                        key: &key,
                        value: &decoded.value,
                        expiry,
                        reported_len: decoded.reported_len,
                    };

                    if consumer.record(&record) == Flow::Abort {
                        debug!("Consumer aborted after {} records", self.stats.total_records());
                        if let Some(previous) = open_database.take() {
                            consumer.end_database(previous);
                        }
                        consumer.end_rdb();
                        return Ok(Outcome::Aborted {
                            version: rdb_version,
                        });
                    }
                }
            }
        }

        if let Some(previous) = open_database.take() {
            consumer.end_database(previous);
        }
        consumer.end_rdb();

        let checksum = self.verify_checksum(rdb_version)?;
        Ok(Outcome::Completed {
            version: rdb_version,
            checksum,
        })
    }

    fn verify_checksum(&mut self, rdb_version: u32) -> RdbResult<Checksum> {
        if rdb_version < version::CHECKSUM {
            return Ok(Checksum::Absent);
        }

        let actual = self.reader.checksum();
        let expected = self.reader.read_trailer()?;

        if expected == 0 {
            warn!("Checksum trailer is zero, checksums were disabled when writing");
            Ok(Checksum::Disabled)
        } else if expected != actual {
            warn!(
                "Checksum mismatch: stored {:016x}, computed {:016x}",
                expected, actual
            );
            Err(RdbError::ChecksumMismatch { expected, actual })
        } else {
            Ok(Checksum::Verified(actual))
        }
    }
}
