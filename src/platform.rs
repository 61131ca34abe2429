//! Host platform to interpreter binary mapping.

use crate::error::ExecError;
use std::path::{Path, PathBuf};

/// Platform families the interpreter ships binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    Linux,
    MacOs,
}

impl PlatformFamily {
    /// Classify an OS name such as `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Result<Self, ExecError> {
        match os.to_ascii_lowercase().as_str() {
            "linux" => Ok(PlatformFamily::Linux),
            "macos" | "darwin" => Ok(PlatformFamily::MacOs),
            _ => Err(ExecError::UnsupportedPlatform(os.to_string())),
        }
    }

    pub fn binary_name(&self) -> &'static str {
        match self {
            PlatformFamily::Linux => "tint-linux",
            PlatformFamily::MacOs => "tint-mac",
        }
    }
}

/// Name of the platform this process was built for.
pub fn host_os() -> &'static str {
    std::env::consts::OS
}

/// Finds the interpreter inside a binary directory.
#[derive(Debug, Clone)]
pub struct BinaryResolver {
    bin_dir: PathBuf,
}

impl BinaryResolver {
    pub fn new(bin_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin_dir: bin_dir.into(),
        }
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn resolve(&self, os: &str) -> Result<PathBuf, ExecError> {
        let family = PlatformFamily::from_os(os)?;
        Ok(self.bin_dir.join(family.binary_name()))
    }
}
