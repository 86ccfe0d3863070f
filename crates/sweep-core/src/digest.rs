//! Reduction of one run's telemetry into a digest row.
//!
//! Average throughput is the mean of per-write throughputs, so every write
//! counts equally regardless of its size. It is not total bytes over total
//! time.

use crate::merge::NameDescriptor;
use crate::telemetry::{CloseRecord, TelemetryReader, TelemetryRecord, WriteRecord};
use sweep_common::{Error, Result};
use sweep_math::{RunningMax, RunningMean};
use tracing::{debug, warn};

/// Summary statistics for one sweep point.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestRow {
    pub descriptor: NameDescriptor,
    /// Descriptor rendered as `dim=variant` pairs.
    pub name: String,
    /// Mean of per-write bytes/second.
    pub avg_byte_throughput: f64,
    pub max_arena_size: i64,
    pub max_in_use_size: i64,
    pub max_mmap_size: i64,
    /// Close duration in seconds, absent if the run reported none.
    pub close_time: Option<f64>,
}

/// Single-pass accumulator over telemetry records.
#[derive(Debug, Clone, Default)]
pub struct DigestAccumulator {
    throughput: RunningMean,
    arena: RunningMax<i64>,
    in_use: RunningMax<i64>,
    mmap: RunningMax<i64>,
    close: Option<CloseRecord>,
    close_records: u64,
}

impl DigestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TelemetryRecord) {
        match record {
            TelemetryRecord::Write(write) => self.push_write(&write),
            TelemetryRecord::Close(close) => {
                self.close_records += 1;
                if self.close_records > 1 {
                    warn!(
                        close_records = self.close_records,
                        "multiple close records, keeping the last"
                    );
                }
                self.close = Some(close);
            }
        }
    }

    fn push_write(&mut self, write: &WriteRecord) {
        if self.close_records > 0 {
            warn!(write_ns = write.write_ns, "write record after close record");
        }
        self.throughput.push(write.byte_throughput());
        self.arena.push(write.arena_bytes);
        self.in_use.push(write.in_use_bytes);
        self.mmap.push(write.mmap_bytes);
    }

    /// Number of write records seen.
    pub fn write_count(&self) -> u64 {
        self.throughput.count()
    }

    /// Build the digest row. Fails if no write records were pushed.
    pub fn finish(self, descriptor: &NameDescriptor) -> Result<DigestRow> {
        let (Some(avg), Some(arena), Some(in_use), Some(mmap)) = (
            self.throughput.mean(),
            self.arena.max(),
            self.in_use.max(),
            self.mmap.max(),
        ) else {
            return Err(Error::NoWriteRecords);
        };

        debug!(
            writes = self.write_count(),
            close_records = self.close_records,
            "telemetry reduced"
        );

        Ok(DigestRow {
            descriptor: descriptor.clone(),
            name: descriptor.display_name(),
            avg_byte_throughput: avg,
            max_arena_size: arena,
            max_in_use_size: in_use,
            max_mmap_size: mmap,
            close_time: self.close.map(|c| c.close_seconds()),
        })
    }
}

/// Parse `raw` telemetry and reduce it to a digest row for `descriptor`.
pub fn make_digest(descriptor: &NameDescriptor, raw: &str) -> Result<DigestRow> {
    let mut acc = DigestAccumulator::new();
    for record in TelemetryReader::from_text(raw)? {
        acc.push(record?);
    }
    acc.finish(descriptor)
}
