//! Moves a submission through stage → resolve → run → retire on a worker.

use crate::artifact::ArtifactStore;
use crate::config::ServiceConfig;
use crate::envelope::ExecutionResult;
use crate::error::ExecError;
use crate::invocation::InvocationSpec;
use crate::model::{MachineType, Submission};
use crate::platform::BinaryResolver;
use crate::pool::WorkerPool;
use crate::runner::{self, RunLimits, RunOutcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Cheap to clone; all clones share one worker pool.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    pool: WorkerPool,
    job: Job,
}

/// Per-run context copied into each worker.
#[derive(Debug, Clone)]
struct Job {
    artifacts: ArtifactStore,
    resolver: BinaryResolver,
    platform: String,
    limits: RunLimits,
}

impl Dispatcher {
    pub fn new(config: &ServiceConfig) -> Result<Self, ExecError> {
        let artifacts = ArtifactStore::open(&config.scratch_dir)?;
        info!(
            scratch_dir = %config.scratch_dir.display(),
            bin_dir = %config.bin_dir.display(),
            platform = %config.platform,
            timeout_ms = config.timeout.as_millis() as u64,
            workers = config.workers,
            exit_policy = ?config.exit_policy,
            "Dispatcher ready"
        );
        Ok(Self {
            inner: Arc::new(Inner {
                pool: WorkerPool::new(config.workers),
                job: Job {
                    artifacts,
                    resolver: BinaryResolver::new(&config.bin_dir),
                    platform: config.platform.clone(),
                    limits: RunLimits {
                        timeout: config.timeout,
                        exit_policy: config.exit_policy,
                    },
                },
            }),
        })
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.inner.pool
    }

    /// Run one submission in the given mode. Always yields an envelope.
    pub async fn dispatch(&self, submission: Submission, machine: MachineType) -> ExecutionResult {
        let started = Instant::now();
        let verbose = submission.is_verbose();
        info!(%machine, verbose, "Dispatching submission");

        let job = self.inner.job.clone();
        let timeout = job.limits.timeout;
        let outcome = match self
            .inner
            .pool
            .run(move || job.execute(&submission, machine))
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => RunOutcome::Failed(e),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            RunOutcome::Completed(out) => {
                info!(%machine, elapsed_ms, output_len = out.len(), "Run completed")
            }
            RunOutcome::TimedOut => {
                warn!(%machine, elapsed_ms, error = %ExecError::Timeout(timeout), "Run timed out")
            }
            RunOutcome::Failed(e) => warn!(%machine, elapsed_ms, error = %e, "Run failed"),
        }
        ExecutionResult::from(outcome)
    }

    pub async fn dfa(&self, submission: Submission) -> ExecutionResult {
        self.dispatch(submission, MachineType::Dfa).await
    }

    pub async fn one_way_tm(&self, submission: Submission) -> ExecutionResult {
        self.dispatch(submission, MachineType::OneWayTm).await
    }

    pub async fn two_way_tm(&self, submission: Submission) -> ExecutionResult {
        self.dispatch(submission, MachineType::TwoWayTm).await
    }

    /// Refuse new submissions and wait for running ones.
    pub async fn shutdown(&self) {
        self.inner.pool.shutdown().await;
    }
}

impl Job {
    /// Blocking body of a dispatch. Runs on a pool worker.
    fn execute(&self, submission: &Submission, machine: MachineType) -> RunOutcome {
        match self.try_execute(submission, machine) {
            Ok(outcome) => outcome,
            Err(e) => RunOutcome::Failed(e),
        }
    }

    fn try_execute(&self, submission: &Submission, machine: MachineType) -> Result<RunOutcome, ExecError> {
        let program = self.artifacts.stage(&submission.program)?;
        let tests = self.artifacts.stage(&submission.tests)?;

        // Both artifacts drop (and are removed) if resolution fails.
        let binary = self.resolver.resolve(&self.platform)?;
        let spec = InvocationSpec {
            binary,
            machine,
            verbose: submission.is_verbose(),
            program: program.path().to_path_buf(),
            tests: tests.path().to_path_buf(),
        };

        let outcome = runner::run(&spec.argv(), &self.limits);

        for artifact in [program, tests] {
            if let Err(e) = artifact.retire() {
                warn!(error = %e, "Artifact cleanup failed");
            }
        }
        Ok(outcome)
    }
}
