//! # Task Queue Module
//!
//! Coda condivisa dei job in attesa.
//!
//! ## Ciclo di vita:
//! - Popolata interamente alla costruzione, prima che parta qualsiasi worker
//! - Non espone alcuna operazione di inserimento
//! - Si svuota in modo strettamente monotono fino a zero
//!
//! ## Claim:
//! `try_claim()` rimuove un job sotto mutex e lo restituisce, oppure `None`
//! se la coda è vuota. Non si blocca mai in attesa di nuovi job.

use crate::job::ConversionJob;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Pre-populated queue of pending jobs, shared by all workers
#[derive(Debug)]
pub struct TaskQueue {
    pending: Mutex<VecDeque<ConversionJob>>,
    total: usize,
}

impl TaskQueue {
    /// Create a queue holding every job of the batch
    pub fn new(jobs: Vec<ConversionJob>) -> Self {
        let total = jobs.len();
        Self {
            pending: Mutex::new(jobs.into()),
            total,
        }
    }

    /// Atomically remove one job; `None` once the queue is drained
    pub fn try_claim(&self) -> Option<ConversionJob> {
        // Nothing panics while the lock is held, a poisoned guard is still consistent
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let job = pending.pop_front();
        if let Some(ref job) = job {
            debug!("Claimed {} ({} left)", job.source().display(), pending.len());
        }
        job
    }

    /// Number of jobs the queue was created with
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of jobs not yet claimed
    pub fn remaining(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}
