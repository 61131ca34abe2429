//! Internal failure taxonomy for interpreter runs.
//!
//! None of these reach a caller verbatim; the envelope collapses them into a
//! fixed message and they only show up in logs.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("wait failed: {0}")]
    Wait(String),
    #[error("non-zero exit code: {code}")]
    NonZeroExit { code: i32 },
    #[error("killed by signal")]
    KilledBySignal,
    #[error("missing program")]
    MissingProgram,
    #[error("artifact: {0}")]
    Artifact(String),
    #[error("worker pool is shut down")]
    PoolClosed,
    #[error("worker failed: {0}")]
    Worker(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ExecError {
    fn from(e: std::io::Error) -> Self {
        ExecError::Io(e.to_string())
    }
}
