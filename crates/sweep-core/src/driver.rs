//! Sequential sweep driver.
//!
//! Runs every sweep point in the order produced by [`build_configs`], one at a
//! time, and reduces each run to a [`DigestRow`]. The first failure aborts the
//! sweep; no partial table is returned.

use crate::digest::{make_digest, DigestRow};
use crate::invoke::BenchmarkRunner;
use crate::merge::{build_configs, SweepPoint};
use std::time::Instant;
use sweep_common::{Result, SweepId};
use sweep_config::DimensionSet;
use tracing::{info, info_span};

/// A configured sweep over a dimension set.
pub struct Sweep<'a> {
    id: SweepId,
    dimensions: &'a DimensionSet,
    runner: &'a dyn BenchmarkRunner,
}

impl<'a> Sweep<'a> {
    pub fn new(dimensions: &'a DimensionSet, runner: &'a dyn BenchmarkRunner) -> Self {
        Self {
            id: SweepId::new(),
            dimensions,
            runner,
        }
    }

    pub fn id(&self) -> &SweepId {
        &self.id
    }

    /// Every sweep point, in execution order.
    pub fn plan(&self) -> Vec<SweepPoint> {
        build_configs(self.dimensions)
    }

    /// Run every sweep point and collect the digests in order.
    ///
    /// Errors carry the display name of the point that failed.
    pub fn run(&self) -> Result<Vec<DigestRow>> {
        let sweep_span = info_span!("sweep", id = %self.id);
        let _sweep = sweep_span.enter();

        let points = self.plan();
        let total = points.len();
        info!(total, dimensions = self.dimensions.len(), "starting sweep");

        let started = Instant::now();
        let mut rows = Vec::with_capacity(total);
        for (index, point) in points.iter().enumerate() {
            let name = point.descriptor.display_name();
            let run_span = info_span!("run", index = index + 1, total, name = %name);
            let _run = run_span.enter();

            info!("running benchmark");
            let run_started = Instant::now();
            let row = self.run_point(point).map_err(|e| e.in_run(&name))?;
            info!(
                elapsed_ms = run_started.elapsed().as_millis() as u64,
                avg_byte_throughput = row.avg_byte_throughput,
                "benchmark complete"
            );
            rows.push(row);
        }

        info!(
            runs = rows.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sweep complete"
        );
        Ok(rows)
    }

    fn run_point(&self, point: &SweepPoint) -> Result<DigestRow> {
        let raw = self.runner.run_once(&point.config)?;
        make_digest(&point.descriptor, &raw)
    }
}
