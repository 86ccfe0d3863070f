//! bench-sweep core: configuration product, run invocation, and telemetry digests.
//!
//! A sweep expands a [`DimensionSet`](sweep_config::DimensionSet) into every
//! combination of variants, runs the external benchmark once per combination,
//! and reduces each run's telemetry to a single [`DigestRow`].

pub mod digest;
pub mod driver;
pub mod exit_codes;
pub mod invoke;
pub mod logging;
pub mod merge;
pub mod output;
pub mod telemetry;

pub use digest::{make_digest, DigestAccumulator, DigestRow};
pub use driver::Sweep;
pub use exit_codes::ExitCode;
pub use invoke::{BenchmarkRunner, ProcessRunner, ScratchDir};
pub use merge::{build_configs, overlay, NameDescriptor, SweepPoint};
pub use output::{write_digest, write_digest_file, write_plan, OutputFormat};
pub use telemetry::{CloseRecord, TelemetryReader, TelemetryRecord, WriteRecord};
