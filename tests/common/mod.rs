#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;
use tint_service::{ExitPolicy, ServiceConfig, Submission};

/// Stand-in for the Tint interpreter.
///
/// Reacts to markers in the program text:
/// `LOOP` spins forever, `FAIL` prints and exits 7, `ECHO` prints the mode,
/// the verbose flag and the program. Anything else prints the accept trace.
const FAKE_INTERPRETER: &str = r#"#!/bin/sh
mode=""
verbose=0
while [ $# -gt 2 ]; do
  case "$1" in
    -m) mode="$2"; shift 2 ;;
    -v) verbose=1; shift ;;
    *) echo "unexpected argument: $1"; exit 64 ;;
  esac
done
prog="$1"
tests="$2"

if grep -q LOOP "$prog"; then
  while :; do :; done
fi
if grep -q FAIL "$prog"; then
  echo "crashed"
  exit 7
fi
if grep -q ECHO "$prog"; then
  echo "mode=$mode verbose=$verbose"
  cat "$prog"
  exit 0
fi

input=$(head -n 1 "$tests")
if [ "$verbose" = 1 ]; then
  printf 'Simulating with "%s".\n' "$input"
  printf 'start: a b _\n      ^\n'
  printf 'q1: _ b _\n     ^\n'
  printf 'accept: _ _ _\n           ^\n'
fi
printf 'Accepted.\n\n1 accepted.\n0 rejected.\n0 errors.\n'
"#;

pub const EXAMPLE_PROGRAM: &str = "start: start \naccept: accept \nreject: reject \n\ntransitions:\n- [start, a, q1, _, R]\n- [start, _, reject, _, R]\n- [q1, a, accept, _, R]\n- [q1, _, reject, _, R]";

pub const SUMMARY: &str = "1 accepted.\n0 rejected.\n0 errors.\n";

/// Written once per test binary, before any test spawns a process.
pub fn bin_dir() -> &'static Path {
    static BIN: OnceLock<TempDir> = OnceLock::new();
    BIN.get_or_init(|| {
        let dir = tempfile::Builder::new()
            .prefix("fake-tint")
            .tempdir()
            .unwrap();
        for name in ["tint-linux", "tint-mac"] {
            let path = dir.path().join(name);
            fs::write(&path, FAKE_INTERPRETER).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        dir
    })
    .path()
}

pub struct Fixture {
    pub scratch: TempDir,
    pub bin_dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            bin_dir: bin_dir().to_path_buf(),
            scratch: tempfile::tempdir().unwrap(),
        }
    }

    pub fn config(&self) -> ServiceConfig {
        ServiceConfig {
            scratch_dir: self.scratch.path().to_path_buf(),
            bin_dir: self.bin_dir.clone(),
            platform: std::env::consts::OS.to_string(),
            timeout: Duration::from_secs(3),
            workers: 4,
            exit_policy: ExitPolicy::Capture,
        }
    }

    pub fn scratch_entries(&self) -> Vec<PathBuf> {
        fs::read_dir(self.scratch.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }
}

pub fn submission(program: &str, tests: &str, verbose: Option<bool>) -> Submission {
    Submission {
        program: program.to_string(),
        tests: tests.to_string(),
        verbose,
    }
}
