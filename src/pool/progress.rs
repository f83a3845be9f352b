//! # Progress Tracking Module
//!
//! Contatore thread-safe dei job completati con notifica verso un backend
//! di visualizzazione.
//!
//! ## Responsabilità:
//! - Conta ogni job completato esattamente una volta (successo o errore)
//! - Inoltra `(completed, total)` al backend ad ogni tick
//! - Isola i fallimenti del backend: un panic nel rendering non interrompe
//!   il worker che ha chiamato `tick()`
//!
//! ## Backend disponibili:
//! - `BarBackend`: progress bar `indicatif` con elapsed e ETA
//! - `JsonBackend`: eventi `progress` JSON su stdout
//! - `NoopBackend`: nessun output (test, modalità silenziosa)
//!
//! ## Visual feedback:
//! ```text
//! ⠋ Converting files [00:00:12] [████████████████------] 31/48 (64%) ETA 00:00:06
//! ```

use crate::json_output::JsonMessage;
use indicatif::{ProgressBar, ProgressStyle};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Display surface notified on every completed job
pub trait ProgressBackend: Send + Sync {
    /// Called once per tick with the new completed count
    fn report(&self, completed: usize, total: usize);

    /// Called once when the batch is done
    fn finish(&self, _summary: &str) {}

    /// Run `f` with the display hidden, so log lines do not tear it
    fn suspend(&self, f: &mut dyn FnMut()) {
        f()
    }
}

const BAR_TEMPLATE: &str =
    "{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA {eta} {msg}";

/// Progress bar backend
pub struct BarBackend {
    bar: ProgressBar,
}

impl BarBackend {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_prefix("Converting files");
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }
}

impl ProgressBackend for BarBackend {
    fn report(&self, completed: usize, _total: usize) {
        self.bar.set_position(completed as u64);
    }

    fn finish(&self, summary: &str) {
        self.bar.finish_with_message(summary.to_string());
    }

    fn suspend(&self, f: &mut dyn FnMut()) {
        self.bar.suspend(f)
    }
}

/// Line-delimited JSON backend
pub struct JsonBackend;

impl ProgressBackend for JsonBackend {
    fn report(&self, completed: usize, total: usize) {
        JsonMessage::progress(completed, total).emit();
    }
}

/// Backend that renders nothing
pub struct NoopBackend;

impl ProgressBackend for NoopBackend {
    fn report(&self, _completed: usize, _total: usize) {}
}

/// Thread-safe completed-job counter shared by all workers
#[derive(Clone)]
pub struct ProgressTracker {
    total: usize,
    // Held while reporting, so the backend sees counts in increasing order
    completed: Arc<Mutex<usize>>,
    backend: Arc<dyn ProgressBackend>,
}

impl ProgressTracker {
    /// Crea un nuovo tracker
    pub fn new(total: usize, backend: Arc<dyn ProgressBackend>) -> Self {
        Self {
            total,
            completed: Arc::new(Mutex::new(0)),
            backend,
        }
    }

    /// Tracker without any display surface
    pub fn silent(total: usize) -> Self {
        Self::new(total, Arc::new(NoopBackend))
    }

    /// Record one completed job and notify the backend; returns the new count
    pub fn tick(&self) -> usize {
        let mut count = self.lock_count();
        *count += 1;
        let completed = *count;
        debug_assert!(completed <= self.total, "more ticks than jobs");

        let backend = &self.backend;
        let total = self.total;
        if catch_unwind(AssertUnwindSafe(|| backend.report(completed, total))).is_err() {
            debug!("Progress backend failed at {}/{}", completed, total);
        }
        completed
    }

    /// Finalizza il backend con un messaggio di riepilogo
    pub fn finish(&self, summary: &str) {
        let backend = &self.backend;
        if catch_unwind(AssertUnwindSafe(|| backend.finish(summary))).is_err() {
            debug!("Progress backend failed while finishing");
        }
    }

    /// Run `f` (typically a log call) without tearing the display
    pub fn suspend<F: FnOnce()>(&self, f: F) {
        let mut f = Some(f);
        let backend = &self.backend;
        let mut call = || {
            if let Some(f) = f.take() {
                f()
            }
        };
        if catch_unwind(AssertUnwindSafe(|| backend.suspend(&mut call))).is_err() {
            debug!("Progress backend failed while suspended");
        }
    }

    pub fn completed(&self) -> usize {
        *self.lock_count()
    }

    fn lock_count(&self) -> std::sync::MutexGuard<'_, usize> {
        // Backend panics are caught before the guard drops, poisoning cannot leave a bad count
        self.completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Ticks the tracker when dropped, whatever path left the job's scope
pub(crate) struct TickGuard<'a> {
    tracker: &'a ProgressTracker,
}

impl<'a> TickGuard<'a> {
    pub(crate) fn new(tracker: &'a ProgressTracker) -> Self {
        Self { tracker }
    }
}

impl Drop for TickGuard<'_> {
    fn drop(&mut self) {
        self.tracker.tick();
    }
}
