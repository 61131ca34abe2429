//! Argument vector for one interpreter run.

use crate::model::MachineType;
use std::ffi::OsString;
use std::path::PathBuf;

/// Everything needed to launch the interpreter once.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    pub binary: PathBuf,
    pub machine: MachineType,
    pub verbose: bool,
    pub program: PathBuf,
    pub tests: PathBuf,
}

impl InvocationSpec {
    /// `<binary> -m <mode> [-v] <program> <tests>`
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(6);
        argv.push(self.binary.clone().into_os_string());
        argv.push("-m".into());
        argv.push(self.machine.as_str().into());
        if self.verbose {
            argv.push("-v".into());
        }
        argv.push(self.program.clone().into_os_string());
        argv.push(self.tests.clone().into_os_string());
        argv
    }
}
