//! bench-sweep CLI entry point.

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use sweep_common::Result;
use sweep_config::{resolve_benchmark, resolve_dimensions, ConfigPaths};
use sweep_core::logging::{init_logging, LogFormat};
use sweep_core::{
    write_digest, write_digest_file, write_plan, ExitCode, OutputFormat, ProcessRunner, Sweep,
};
use tracing::{error, info};

/// Run a benchmark once per combination of configuration variants and
/// summarize each run's telemetry into one table row.
#[derive(Parser, Debug)]
#[command(name = "bench-sweep", version, about)]
struct Cli {
    /// Write the digest table here instead of stdout
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Benchmark executable, called as `<exe> <yaml-config> <scratch-dir>`
    #[arg(long, env = "SWEEP_BENCHMARK", value_name = "PATH")]
    benchmark: Option<PathBuf>,

    /// Extra argument passed to the benchmark before the configuration (repeatable)
    #[arg(long = "benchmark-arg", value_name = "ARG", allow_hyphen_values = true)]
    benchmark_args: Vec<String>,

    /// Dimension file (YAML, or JSON by extension)
    #[arg(long, env = "SWEEP_DIMENSIONS", value_name = "PATH")]
    dimensions: Option<PathBuf>,

    /// Digest output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Print the planned sweep points without running the benchmark
    #[arg(long)]
    list: bool,

    /// Parent directory for per-run scratch directories
    #[arg(long, value_name = "DIR")]
    scratch_root: Option<PathBuf>,

    /// Diagnostic log format (always written to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Increase diagnostic verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease diagnostic verbosity
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl Cli {
    fn verbosity(&self) -> i8 {
        let up = i8::try_from(self.verbose).unwrap_or(i8::MAX);
        let down = i8::try_from(self.quiet).unwrap_or(i8::MAX);
        up.saturating_sub(down)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbosity());

    let code = match run(&cli) {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            error!(code = e.code(), "{e}");
            ExitCode::from(&e)
        }
    };
    std::process::exit(code.as_i32());
}

fn run(cli: &Cli) -> Result<()> {
    let resolved = resolve_dimensions(cli.dimensions.as_deref(), &ConfigPaths::from_env())?;
    let dimensions = &resolved.set;
    info!(
        source = %resolved.source,
        dimensions = dimensions.len(),
        combinations = dimensions.combination_count().unwrap_or(usize::MAX),
        "dimensions loaded"
    );

    let runner = ProcessRunner::new(resolve_benchmark(cli.benchmark.as_deref())?)
        .with_leading_args(cli.benchmark_args.iter().cloned())
        .with_scratch_root(cli.scratch_root.clone());
    let sweep = Sweep::new(dimensions, &runner);

    if cli.list {
        let stdout = std::io::stdout();
        return write_plan(stdout.lock(), &sweep.plan(), cli.format);
    }

    info!(
        sweep = %sweep.id(),
        benchmark = %runner.executable().display(),
        "using benchmark"
    );
    let rows = sweep.run()?;

    let names = dimensions.names();
    match &cli.output {
        Some(path) => {
            write_digest_file(path, &rows, &names, cli.format)?;
            info!(path = %path.display(), rows = rows.len(), "digest written");
        }
        None => {
            let stdout = std::io::stdout();
            write_digest(stdout.lock(), &rows, &names, cli.format)?;
        }
    }
    Ok(())
}
