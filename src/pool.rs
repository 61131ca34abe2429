//! Bounded pool for blocking work.
//!
//! Jobs run on tokio's blocking threads, but no more than `size` at once: a
//! caller first waits for a permit, and the permit travels into the job so it
//! is released only when the job itself finishes.

use crate::error::ExecError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;

#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
    closed: AtomicBool,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
            closed: AtomicBool::new(false),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs currently holding a worker.
    pub fn in_flight(&self) -> usize {
        self.size - self.permits.available_permits()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Run `job` on a worker and wait for its result.
    pub async fn run<F, T>(&self, job: F) -> Result<T, ExecError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_closed() {
            return Err(ExecError::PoolClosed);
        }
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ExecError::PoolClosed)?;
        // shutdown may have started while we were queued
        if self.is_closed() {
            return Err(ExecError::PoolClosed);
        }

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| ExecError::Worker(e.to_string()))
    }

    /// Stop admitting jobs and wait for the running ones to finish.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        info!(in_flight = self.in_flight(), "Draining worker pool");
        if let Ok(all) = self.permits.acquire_many(self.size as u32).await {
            all.forget();
        }
        self.permits.close();
        info!("Worker pool closed");
    }
}
