//! Runtime configuration shared by the server and the one-shot CLI.

use crate::platform;
use std::path::PathBuf;
use std::time::Duration;

/// Wall-clock bound for one interpreter run (3 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

/// What a non-zero interpreter exit means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExitPolicy {
    /// Return whatever the interpreter printed, exit code notwithstanding.
    #[default]
    Capture,
    /// Report the run as failed.
    Fail,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub scratch_dir: PathBuf,
    pub bin_dir: PathBuf,
    /// OS name fed to the binary resolver.
    pub platform: String,
    pub timeout: Duration,
    pub workers: usize,
    pub exit_policy: ExitPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            bin_dir: PathBuf::from("."),
            platform: platform::host_os().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            workers: default_workers(),
            exit_policy: ExitPolicy::default(),
        }
    }
}

pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("tint-artifacts")
}

pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
