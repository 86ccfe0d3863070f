//! Streaming reader for raw benchmark telemetry.
//!
//! The benchmark prints one CSV row per timed write, then a single row
//! carrying only the close duration:
//!
//! ```text
//! sqc,num_bytes,num_msgs,write_ns,arena_bytes,in_use_bytes,mmap_bytes,close_ns
//! 0,1000000,1,81234,135168,1000512,0,
//! ,,,,,,,5123456
//! ```
//!
//! Rows are parsed lazily into [`TelemetryRecord`]s with numeric fields
//! converted up front. Columns the reader does not know (`sqc`, `num_msgs`)
//! are ignored. Memory columns are signed: the benchmark reports them as
//! deltas from a baseline taken before the first write.

use csv::StringRecord;
use std::io::Read;
use std::str::FromStr;
use sweep_common::{Error, Result};

pub const WRITE_NS: &str = "write_ns";
pub const NUM_BYTES: &str = "num_bytes";
pub const ARENA_BYTES: &str = "arena_bytes";
pub const IN_USE_BYTES: &str = "in_use_bytes";
pub const MMAP_BYTES: &str = "mmap_bytes";
pub const CLOSE_NS: &str = "close_ns";

const NANOS_PER_SEC: f64 = 1e9;

/// One timed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    pub write_ns: u64,
    pub num_bytes: u64,
    pub arena_bytes: i64,
    pub in_use_bytes: i64,
    pub mmap_bytes: i64,
}

impl WriteRecord {
    pub fn write_seconds(&self) -> f64 {
        self.write_ns as f64 / NANOS_PER_SEC
    }

    /// Bytes per second for this write alone.
    pub fn byte_throughput(&self) -> f64 {
        self.num_bytes as f64 / self.write_seconds()
    }
}

/// Time taken to close the output after the last write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseRecord {
    pub close_ns: u64,
}

impl CloseRecord {
    pub fn close_seconds(&self) -> f64 {
        self.close_ns as f64 / NANOS_PER_SEC
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryRecord {
    Write(WriteRecord),
    Close(CloseRecord),
}

/// Header positions of the recognized columns.
#[derive(Debug, Clone, Copy)]
struct Columns {
    write_ns: usize,
    num_bytes: usize,
    arena_bytes: usize,
    in_use_bytes: usize,
    mmap_bytes: usize,
    close_ns: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingField {
                    field: name.to_string(),
                })
        };
        Ok(Self {
            write_ns: find(WRITE_NS)?,
            num_bytes: find(NUM_BYTES)?,
            arena_bytes: find(ARENA_BYTES)?,
            in_use_bytes: find(IN_USE_BYTES)?,
            mmap_bytes: find(MMAP_BYTES)?,
            close_ns: find(CLOSE_NS)?,
        })
    }

    fn parse(&self, record: &StringRecord) -> Result<TelemetryRecord> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let close = record.get(self.close_ns).unwrap_or("");
        if !close.is_empty() {
            return Ok(TelemetryRecord::Close(CloseRecord {
                close_ns: parse_field(close, CLOSE_NS, line)?,
            }));
        }

        let field = |idx: usize| record.get(idx).unwrap_or("");
        let write_ns: u64 = parse_field(field(self.write_ns), WRITE_NS, line)?;
        if write_ns == 0 {
            return Err(Error::InvalidField {
                field: WRITE_NS.to_string(),
                value: "0".to_string(),
                line,
            });
        }

        Ok(TelemetryRecord::Write(WriteRecord {
            write_ns,
            num_bytes: parse_field(field(self.num_bytes), NUM_BYTES, line)?,
            arena_bytes: parse_field(field(self.arena_bytes), ARENA_BYTES, line)?,
            in_use_bytes: parse_field(field(self.in_use_bytes), IN_USE_BYTES, line)?,
            mmap_bytes: parse_field(field(self.mmap_bytes), MMAP_BYTES, line)?,
        }))
    }
}

fn parse_field<T: FromStr>(raw: &str, field: &str, line: u64) -> Result<T> {
    raw.parse::<T>().map_err(|_| Error::InvalidField {
        field: field.to_string(),
        value: raw.to_string(),
        line,
    })
}

/// Lazy row-by-row reader over a telemetry table.
pub struct TelemetryReader<R> {
    records: csv::StringRecordsIntoIter<R>,
    columns: Columns,
}

impl<R: Read> TelemetryReader<R> {
    /// Read the header and locate the recognized columns.
    pub fn new(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv
            .headers()
            .map_err(|e| Error::Telemetry(e.to_string()))?
            .clone();
        let columns = Columns::resolve(&headers)?;
        Ok(Self {
            records: csv.into_records(),
            columns,
        })
    }
}

impl<'a> TelemetryReader<&'a [u8]> {
    pub fn from_text(text: &'a str) -> Result<Self> {
        Self::new(text.as_bytes())
    }
}

impl<R: Read> Iterator for TelemetryReader<R> {
    type Item = Result<TelemetryRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(Error::Telemetry(e.to_string()))),
        };
        Some(self.columns.parse(&record))
    }
}
