//! Invocation of the external benchmark executable.
//!
//! The benchmark is called as
//! `<executable> [leading args...] <yaml-config> <scratch-dir>` and must print
//! its telemetry table to stdout. Its stderr is passed through to ours.
//!
//! Each run gets a fresh scratch directory that is released explicitly
//! after the process exits, whether or not the run succeeded.

use serde_yaml::Mapping;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use sweep_common::{Error, Result};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Prefix of per-run scratch directory names.
pub const SCRATCH_PREFIX: &str = "bench-sweep-";

/// Runs one benchmark for a merged configuration and returns its raw telemetry.
pub trait BenchmarkRunner {
    fn run_once(&self, config: &Mapping) -> Result<String>;
}

/// Serialize a merged configuration to the YAML text passed to the benchmark.
pub fn serialize_config(config: &Mapping) -> Result<String> {
    serde_yaml::to_string(config).map_err(|e| Error::ConfigSerialization(e.to_string()))
}

/// Uniquely named scratch directory scoped to a single run.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a new scratch directory under `root`, or the system temp dir.
    pub fn acquire(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        debug!(path = %dir.path().display(), "scratch directory created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory. Failures are logged, never returned.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "scratch directory removed"),
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "failed to remove scratch directory"
            ),
        }
    }
}

/// Runs the benchmark as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    executable: PathBuf,
    leading_args: Vec<OsString>,
    scratch_root: Option<PathBuf>,
}

impl ProcessRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            leading_args: Vec::new(),
            scratch_root: None,
        }
    }

    /// Arguments placed before the configuration, e.g. a script for an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Create scratch directories under `root` instead of the system temp dir.
    pub fn with_scratch_root(mut self, root: Option<PathBuf>) -> Self {
        self.scratch_root = root;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn invoke(&self, yaml: &str, scratch: &Path) -> Result<String> {
        debug!(executable = %self.executable.display(), "launching benchmark");
        let output = Command::new(&self.executable)
            .args(&self.leading_args)
            .arg(yaml)
            .arg(scratch)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| Error::Spawn {
                executable: self.executable.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::BenchmarkFailed {
                status: output.status.to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| Error::UnreadableOutput(e.to_string()))
    }
}

impl BenchmarkRunner for ProcessRunner {
    fn run_once(&self, config: &Mapping) -> Result<String> {
        let yaml = serialize_config(config)?;
        let scratch = ScratchDir::acquire(self.scratch_root.as_deref())?;
        let result = self.invoke(&yaml, scratch.path());
        scratch.release();
        result
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;

    /// Runner executing `script` through `/bin/sh`; `$1` is the config, `$2` the scratch dir.
    fn sh_runner(dir: &TempDir, script: &str) -> ProcessRunner {
        let path = dir.path().join("bench.sh");
        fs::write(&path, script).expect("write script");
        ProcessRunner::new("/bin/sh").with_leading_args([path])
    }

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).expect("mapping yaml")
    }

    #[test]
    fn serializes_config_as_yaml() {
        let yaml = serialize_config(&mapping("storage_id: mcap\nstorage_options: {noCRC: true}"))
            .unwrap();
        let back: Mapping = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, mapping("storage_id: mcap\nstorage_options: {noCRC: true}"));
    }

    #[test]
    fn passes_config_and_scratch_dir_and_captures_stdout() {
        let dir = TempDir::new().expect("tempdir");
        let runner = sh_runner(
            &dir,
            "[ -d \"$2\" ] || exit 9\nprintf '%s\\n' \"$1\"\nprintf '%s\\n' \"$2\"\n",
        )
        .with_scratch_root(Some(dir.path().to_path_buf()));

        let out = runner.run_once(&mapping("storage_id: sqlite3")).expect("run");
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("storage_id: sqlite3"));
        let scratch = PathBuf::from(lines.last().expect("scratch line"));
        assert!(scratch.starts_with(dir.path()));
        assert!(scratch
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SCRATCH_PREFIX)));
        assert!(!scratch.exists(), "scratch dir must be removed after the run");
    }

    #[test]
    fn non_zero_exit_is_fatal_and_scratch_is_removed() {
        let dir = TempDir::new().expect("tempdir");
        let marker = dir.path().join("scratch-path");
        let script = format!("printf '%s' \"$2\" > '{}'\nexit 3\n", marker.display());
        let runner = sh_runner(&dir, &script);

        let err = runner.run_once(&Mapping::new()).unwrap_err();
        assert!(matches!(err, Error::BenchmarkFailed { .. }), "got {err}");
        assert_eq!(err.code(), 21);

        let scratch = PathBuf::from(fs::read_to_string(&marker).expect("marker"));
        assert!(!scratch.exists(), "scratch dir must be removed on failure");
    }

    #[test]
    fn missing_executable_is_spawn_error() {
        let runner = ProcessRunner::new("/nonexistent/single_benchmark");
        let err = runner.run_once(&Mapping::new()).unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }), "got {err}");
    }

    #[test]
    fn non_utf8_output_is_unreadable() {
        let dir = TempDir::new().expect("tempdir");
        let runner = sh_runner(&dir, "printf '\\377\\376'\n");
        let err = runner.run_once(&Mapping::new()).unwrap_err();
        assert!(matches!(err, Error::UnreadableOutput(_)), "got {err}");
    }

    #[test]
    fn scratch_dir_release_removes_contents() {
        let root = TempDir::new().expect("tempdir");
        let scratch = ScratchDir::acquire(Some(root.path())).unwrap();
        let path = scratch.path().to_path_buf();
        fs::write(path.join("out.mcap"), b"data").unwrap();
        scratch.release();
        assert!(!path.exists());
    }

    #[test]
    fn scratch_dir_release_tolerates_missing_directory() {
        let root = TempDir::new().expect("tempdir");
        let scratch = ScratchDir::acquire(Some(root.path())).unwrap();
        let path = scratch.path().to_path_buf();
        fs::remove_dir(&path).unwrap();
        scratch.release();
        assert!(!path.exists());
    }

    #[test]
    fn failed_cleanup_keeps_run_result() {
        let dir = TempDir::new().expect("tempdir");
        let runner = sh_runner(&dir, "rm -rf \"$2\"\necho done\n")
            .with_scratch_root(Some(dir.path().to_path_buf()));

        let out = runner.run_once(&Mapping::new()).expect("run result survives cleanup failure");
        assert_eq!(out, "done\n");
    }
}
