//! Synchronous, deadline-bounded process execution.
//!
//! Runs on a worker thread. The child gets its own process group on Unix so a
//! timeout can take down anything it forked along with it.

use crate::config::ExitPolicy;
use crate::error::ExecError;
use std::ffi::OsString;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Grace for the stdout reader after the process already exited.
const DRAIN_GRACE: Duration = Duration::from_millis(50);

/// Bounds applied to every run.
#[derive(Debug, Clone, Copy)]
pub struct RunLimits {
    pub timeout: Duration,
    pub exit_policy: ExitPolicy,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(String),
    TimedOut,
    Failed(ExecError),
}

/// Run `argv` to completion or until `limits.timeout` elapses.
pub fn run(argv: &[OsString], limits: &RunLimits) -> RunOutcome {
    let Some((program, args)) = argv.split_first() else {
        return RunOutcome::Failed(ExecError::MissingProgram);
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    debug!(argv = ?argv, "Spawning interpreter");
    let started = Instant::now();
    let deadline = started + limits.timeout;

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return RunOutcome::Failed(ExecError::Spawn(e.to_string())),
    };
    debug!(pid = child.id(), "Interpreter spawned");

    let Some(mut stdout) = child.stdout.take() else {
        terminate(&mut child);
        return RunOutcome::Failed(ExecError::Io("stdout not captured".into()));
    };
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let res = stdout.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(res);
    });

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                terminate(&mut child);
                return RunOutcome::Failed(ExecError::Wait(e.to_string()));
            }
        }
        if Instant::now() >= deadline {
            info!(pid = child.id(), elapsed_ms = started.elapsed().as_millis() as u64, "Deadline reached, killing interpreter");
            terminate(&mut child);
            return RunOutcome::TimedOut;
        }
        thread::sleep(POLL_INTERVAL);
    };

    // Something the child left behind may still hold the pipe open.
    let wait = deadline
        .saturating_duration_since(Instant::now())
        .max(DRAIN_GRACE);
    let stdout = match rx.recv_timeout(wait) {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => return RunOutcome::Failed(ExecError::Io(e.to_string())),
        Err(_) => {
            warn!(pid = child.id(), "Output pipe still open at deadline");
            kill_group(&mut child);
            return RunOutcome::TimedOut;
        }
    };

    debug!(
        status = ?status,
        stdout_len = stdout.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Interpreter exited"
    );

    if let Err(e) = check_status(status, limits.exit_policy) {
        return RunOutcome::Failed(e);
    }
    RunOutcome::Completed(String::from_utf8_lossy(&stdout).into_owned())
}

fn check_status(status: ExitStatus, policy: ExitPolicy) -> Result<(), ExecError> {
    if status.success() || policy == ExitPolicy::Capture {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ExecError::NonZeroExit { code }),
        None => Err(ExecError::KilledBySignal),
    }
}

/// Kill the child (and its group) and reap it.
fn terminate(child: &mut Child) {
    kill_group(child);
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "Failed to reap interpreter");
    }
}

#[cfg(unix)]
fn kill_group(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let pgid = Pid::from_raw(child.id() as i32);
    if let Err(e) = killpg(pgid, Signal::SIGKILL) {
        debug!(pgid = ?pgid, error = %e, "killpg failed, falling back to kill");
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_group(child: &mut Child) {
    let _ = child.kill();
}
