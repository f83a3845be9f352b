//! # Pool Module
//!
//! Nucleo di concorrenza del converter, diviso in sottomoduli:
//! - `queue`: coda condivisa dei job con claim atomico
//! - `progress`: contatore dei job completati e backend di visualizzazione
//! - `worker`: pool di worker a dimensione fissa con isolamento degli errori

pub mod progress;
pub mod queue;
pub mod worker;

pub use progress::{BarBackend, JsonBackend, NoopBackend, ProgressBackend, ProgressTracker};
pub use queue::TaskQueue;
pub use worker::{BatchSummary, JobFailure, WorkerPool};
