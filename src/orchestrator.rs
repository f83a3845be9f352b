//! # Batch Orchestrator Module
//!
//! Orchestratore del batch: collega discovery, coda, pool e reporting.
//!
//! ## Flusso di esecuzione:
//! 1. **Discovery**: Trova i file HEIC nella directory di input
//! 2. **Planning**: Crea un `ConversionJob` per file (salta gli output esistenti se richiesto)
//! 3. **Queue**: Popola interamente la `TaskQueue` prima di avviare i worker
//! 4. **Pool**: Avvia N worker e attende che terminino tutti
//! 5. **Reporting**: Logga ogni file fallito e stampa il riepilogo finale
//!
//! ## Error handling:
//! - Errori di configurazione bloccano il batch prima dell'avvio
//! - Errori sui singoli file non bloccano l'operazione: vengono contati,
//!   loggati e riportati nel `BatchSummary`
//!
//! ## Esempio:
//! ```no_run
//! # use heic_converter::{BatchConverter, Config};
//! # async fn example(config: Config) -> anyhow::Result<()> {
//! let converter = BatchConverter::new(config)?;
//! let summary = converter.run().await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    config::Config,
    converter::{Converter, MagickConverter},
    file_manager::FileManager,
    job::{build_jobs, ConversionJob},
    json_output::{JsonConfig, JsonMessage},
    pool::{
        BarBackend, BatchSummary, JobFailure, JsonBackend, ProgressBackend, ProgressTracker,
        TaskQueue, WorkerPool,
    },
};
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Runs one conversion batch end to end
pub struct BatchConverter {
    config: Config,
    converter: Arc<dyn Converter>,
}

impl BatchConverter {
    /// Validate the configuration and resolve the ImageMagick tool
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let converter = MagickConverter::new(config.tool_path.as_deref())?;
        debug!("Using conversion tool: {}", converter.tool().display());
        Ok(Self {
            config,
            converter: Arc::new(converter),
        })
    }

    /// Build an orchestrator around any converter
    pub fn with_converter(config: Config, converter: Arc<dyn Converter>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, converter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Esegue il batch e restituisce il riepilogo
    pub async fn run(&self) -> Result<BatchSummary> {
        let start_time = Instant::now();

        let jobs = self.plan_jobs()?;
        self.emit_start_message(jobs.len());

        if jobs.is_empty() {
            self.handle_empty_directory(start_time);
            return Ok(BatchSummary::default());
        }

        let total = jobs.len();
        let backend: Arc<dyn ProgressBackend> = if self.config.json_output {
            Arc::new(JsonBackend)
        } else {
            Arc::new(BarBackend::new(total))
        };
        let progress = ProgressTracker::new(total, backend);

        let (failure_tx, failure_rx) = mpsc::unbounded_channel();
        let reporter = tokio::spawn(Self::report_failures(
            failure_rx,
            progress.clone(),
            self.config.json_output,
        ));

        let queue = TaskQueue::new(jobs);
        let summary = WorkerPool::new(self.config.workers, self.converter.clone(), progress.clone())
            .with_failure_channel(failure_tx)
            .run(queue)
            .await;

        // Every sender went away with the pool, so the reporter drains and exits
        let failures = reporter.await?;
        progress.finish(&summary.format_summary());
        self.print_final_stats(&summary, &failures, start_time.elapsed().as_secs_f64());

        Ok(summary)
    }

    /// Trova gli input e crea i job del batch
    pub fn plan_jobs(&self) -> Result<Vec<ConversionJob>> {
        let files = FileManager::find_heic_files(&self.config.input_dir, self.config.recursive)?;
        let mut jobs = build_jobs(files, self.config.target_format);

        // `a.heic` and `a.HEIC` derive the same output, only the first one is kept
        let mut destinations = HashSet::new();
        jobs.retain(|job| {
            let unique = destinations.insert(job.destination().to_path_buf());
            if !unique {
                warn!(
                    "Skipping {}: {} is already the output of another file",
                    job.source().display(),
                    job.destination().display()
                );
            }
            unique
        });

        if self.config.skip_existing {
            let before = jobs.len();
            jobs.retain(|job| !job.destination().exists());
            if jobs.len() < before {
                info!("Skipping {} files with existing output", before - jobs.len());
            }
        }

        Ok(jobs)
    }

    async fn report_failures(
        mut failure_rx: mpsc::UnboundedReceiver<JobFailure>,
        progress: ProgressTracker,
        json_output: bool,
    ) -> Vec<JobFailure> {
        let mut failures = Vec::new();
        while let Some(failure) = failure_rx.recv().await {
            if json_output {
                JsonMessage::file_failed(
                    failure.job.source().to_path_buf(),
                    failure.job.destination().to_path_buf(),
                    failure.reason.clone(),
                )
                .emit();
            } else {
                progress.suspend(|| {
                    warn!("Failed to convert {}: {}", failure.job.source().display(), failure.reason)
                });
            }
            failures.push(failure);
        }
        failures
    }

    fn emit_start_message(&self, total_files: usize) {
        if self.config.json_output {
            JsonMessage::start(
                self.config.input_dir.clone(),
                total_files,
                JsonConfig::from(&self.config),
            )
            .emit();
        } else {
            info!(
                "Converting {} HEIC files in {} to {} with {} workers",
                total_files,
                self.config.input_dir.display(),
                self.config.target_format,
                self.config.workers
            );
        }
    }

    fn handle_empty_directory(&self, start_time: Instant) {
        if self.config.json_output {
            JsonMessage::complete(0, 0, 0, start_time.elapsed().as_secs_f64()).emit();
        } else {
            info!("No HEIC files found to convert");
        }
    }

    fn print_final_stats(&self, summary: &BatchSummary, failures: &[JobFailure], duration: f64) {
        if self.config.json_output {
            JsonMessage::complete(summary.total, summary.succeeded, summary.failed, duration).emit();
            return;
        }

        info!("=== Conversion Complete ===");
        info!("Files converted: {}", summary.succeeded);
        info!("Files failed: {}", summary.failed);
        info!("Duration: {:.1}s", duration);
        for failure in failures {
            info!("  ✗ {}", failure.job.source().display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::format::TargetFormat;
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes a small marker file, fails on names containing "corrupt"
    struct FakeConverter;

    #[async_trait]
    impl Converter for FakeConverter {
        async fn convert(&self, job: &ConversionJob) -> Result<(), ConvertError> {
            if job.display_name().contains("corrupt") {
                return Err(ConvertError::Validation("corrupt input".to_string()));
            }
            tokio::fs::write(job.destination(), b"converted").await?;
            Ok(())
        }
    }

    fn touch(path: &Path) {
        std::fs::write(path, b"heic").unwrap();
    }

    fn config_for(dir: &Path) -> Config {
        Config {
            input_dir: dir.to_path_buf(),
            target_format: TargetFormat::Png,
            workers: 3,
            json_output: true,
            ..Default::default()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_converts_all_and_counts_failures() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.heic"));
        touch(&temp_dir.path().join("b.HEIC"));
        touch(&temp_dir.path().join("corrupt.heic"));
        touch(&temp_dir.path().join("ignored.jpg"));

        let batch = BatchConverter::with_converter(config_for(temp_dir.path()), Arc::new(FakeConverter)).unwrap();
        let summary = batch.run().await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(temp_dir.path().join("a.png").exists());
        assert!(temp_dir.path().join("b.png").exists());
        assert!(!temp_dir.path().join("corrupt.png").exists());
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let batch = BatchConverter::with_converter(config_for(temp_dir.path()), Arc::new(FakeConverter)).unwrap();
        assert_eq!(batch.run().await.unwrap(), BatchSummary::default());
    }

    #[test]
    fn test_skip_existing_outputs() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.heic"));
        touch(&temp_dir.path().join("b.heic"));
        touch(&temp_dir.path().join("a.png"));

        let mut config = config_for(temp_dir.path());
        let batch = BatchConverter::with_converter(config.clone(), Arc::new(FakeConverter)).unwrap();
        assert_eq!(batch.plan_jobs().unwrap().len(), 2);

        config.skip_existing = true;
        let batch = BatchConverter::with_converter(config, Arc::new(FakeConverter)).unwrap();
        let jobs = batch.plan_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source(), temp_dir.path().join("b.heic"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_case_variants_do_not_share_an_output() {
        let temp_dir = TempDir::new().unwrap();
        touch(&temp_dir.path().join("a.HEIC"));
        touch(&temp_dir.path().join("a.heic"));
        touch(&temp_dir.path().join("b.heic"));

        let batch = BatchConverter::with_converter(config_for(temp_dir.path()), Arc::new(FakeConverter)).unwrap();
        let jobs = batch.plan_jobs().unwrap();

        let destinations: HashSet<_> = jobs.iter().map(|j| j.destination().to_path_buf()).collect();
        assert_eq!(jobs.len(), 2);
        assert_eq!(destinations.len(), 2);
        assert_eq!(jobs[0].source(), temp_dir.path().join("a.HEIC"));
    }

    #[tokio::test]
    async fn test_failures_reported_through_channel() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(JobFailure {
            job: ConversionJob::new("x.heic", TargetFormat::Jpg),
            reason: "corrupt".to_string(),
        })
        .unwrap();
        drop(tx);

        let failures = BatchConverter::report_failures(rx, ProgressTracker::silent(1), false).await;
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].reason, "corrupt");
    }

    #[test]
    fn test_invalid_config_is_rejected_before_start() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            workers: 0,
            ..config_for(temp_dir.path())
        };
        assert!(BatchConverter::with_converter(config, Arc::new(FakeConverter)).is_err());
    }
}
