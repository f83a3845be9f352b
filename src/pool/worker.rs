//! # Worker Pool Module
//!
//! Pool di dimensione fissa che svuota la `TaskQueue` condivisa.
//!
//! ## Ciclo di ogni worker:
//! 1. `try_claim()` sulla coda; se vuota il worker termina
//! 2. Invoca il `Converter` sul job
//! 3. Tick del progress esattamente una volta, qualunque sia l'esito
//! 4. Torna al punto 1
//!
//! ## Isolamento errori:
//! - Un `Err` del converter viene contato e inoltrato al canale dei
//!   fallimenti (se presente), mai propagato
//! - Un panic del converter viene catturato con `catch_unwind` e trattato
//!   come un normale fallimento del singolo job
//! - Nessun retry: un job fallito non torna in coda
//!
//! ## Shutdown:
//! `run()` attende il termine di tutti gli N worker e restituisce un
//! `BatchSummary`. Il batch risulta sempre completato.

use crate::converter::Converter;
use crate::error::ConvertError;
use crate::job::ConversionJob;
use crate::pool::progress::{ProgressTracker, TickGuard};
use crate::pool::queue::TaskQueue;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

/// A job whose conversion failed, with the reason
#[derive(Debug, Clone)]
pub struct JobFailure {
    pub job: ConversionJob,
    pub reason: String,
}

/// Outcome counts of one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Converted: {} | Failed: {} | Total: {}",
            self.succeeded, self.failed, self.total
        )
    }
}

#[derive(Debug, Default)]
struct WorkerReport {
    succeeded: usize,
    failed: usize,
}

/// Fixed-size group of workers draining one queue
pub struct WorkerPool {
    workers: usize,
    converter: Arc<dyn Converter>,
    progress: ProgressTracker,
    failures: Option<UnboundedSender<JobFailure>>,
}

impl WorkerPool {
    /// Create a pool of `workers` units; a count of zero is raised to one
    pub fn new(workers: usize, converter: Arc<dyn Converter>, progress: ProgressTracker) -> Self {
        Self {
            workers: workers.max(1),
            converter,
            progress,
            failures: None,
        }
    }

    /// Send every failed job to `sender`
    pub fn with_failure_channel(mut self, sender: UnboundedSender<JobFailure>) -> Self {
        self.failures = Some(sender);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Start all workers on a fully populated queue and wait for every one to finish
    pub async fn run(self, queue: TaskQueue) -> BatchSummary {
        let total = queue.total();
        let queue = Arc::new(queue);
        debug!("Starting {} workers on {} jobs", self.workers, total);

        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let queue = queue.clone();
                let converter = self.converter.clone();
                let progress = self.progress.clone();
                let failures = self.failures.clone();
                tokio::spawn(async move {
                    Self::worker_loop(id, queue, converter, progress, failures).await
                })
            })
            .collect();

        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };
        for handle in handles {
            match handle.await {
                Ok(report) => {
                    summary.succeeded += report.succeeded;
                    summary.failed += report.failed;
                }
                Err(e) => error!("Worker terminated abnormally: {}", e),
            }
        }

        debug!("All workers finished: {}", summary.format_summary());
        summary
    }

    async fn worker_loop(
        id: usize,
        queue: Arc<TaskQueue>,
        converter: Arc<dyn Converter>,
        progress: ProgressTracker,
        failures: Option<UnboundedSender<JobFailure>>,
    ) -> WorkerReport {
        let mut report = WorkerReport::default();

        while let Some(job) = queue.try_claim() {
            let _tick = TickGuard::new(&progress);

            match Self::convert_isolated(converter.as_ref(), &job).await {
                Ok(()) => {
                    debug!("[worker {}] converted {}", id, job.display_name());
                    report.succeeded += 1;
                }
                Err(e) => {
                    debug!("[worker {}] failed {}: {}", id, job.display_name(), e);
                    report.failed += 1;
                    if let Some(ref sender) = failures {
                        // Receiver may be gone, the batch goes on regardless
                        let _ = sender.send(JobFailure {
                            job,
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        debug!(
            "[worker {}] queue empty, exiting ({} ok, {} failed)",
            id, report.succeeded, report.failed
        );
        report
    }

    async fn convert_isolated(converter: &dyn Converter, job: &ConversionJob) -> Result<(), ConvertError> {
        AssertUnwindSafe(converter.convert(job))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ConvertError::from_panic(payload)))
    }
}
