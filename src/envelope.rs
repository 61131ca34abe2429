//! The `{status, output}` body every run ends in.

use crate::runner::RunOutcome;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 400;

pub const TIMEOUT_MESSAGE: &str = "Error: Program took too long or encountered an infinite loop";
pub const FAILURE_MESSAGE: &str = "Error: Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: u16,
    pub output: String,
}

impl ExecutionResult {
    pub fn ok(output: String) -> Self {
        Self {
            status: STATUS_OK,
            output,
        }
    }

    pub fn timed_out() -> Self {
        Self {
            status: STATUS_ERROR,
            output: TIMEOUT_MESSAGE.to_string(),
        }
    }

    pub fn failed() -> Self {
        Self {
            status: STATUS_ERROR,
            output: FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

impl From<RunOutcome> for ExecutionResult {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Completed(output) => ExecutionResult::ok(output),
            RunOutcome::TimedOut => ExecutionResult::timed_out(),
            // Failure detail stays in the logs.
            RunOutcome::Failed(_) => ExecutionResult::failed(),
        }
    }
}
