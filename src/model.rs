//! Request-side types: what a caller submits and which mode runs it.

use serde::Deserialize;
use std::fmt;

/// Program text plus test input, as posted by a caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub program: String,
    pub tests: String,
    #[serde(default)]
    pub verbose: Option<bool>,
}

impl Submission {
    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }
}

/// Interpreter operating mode, passed as the `-m` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MachineType {
    Dfa,
    OneWayTm,
    TwoWayTm,
}

impl MachineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MachineType::Dfa => "dfa",
            MachineType::OneWayTm => "one-way-tm",
            MachineType::TwoWayTm => "two-way-tm",
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
