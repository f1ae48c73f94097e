//! Sequential batch execution.

use std::time::{Duration, Instant};

use chrono::Utc;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::info;

use crate::backend::Backend;
use crate::device::Device;

use super::orchestrator::GenerationOrchestrator;
use super::types::{GenerationJob, GenerationResult, serialize_secs};

/// Aggregate counts for a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    #[serde(rename = "total_elapsed_secs", serialize_with = "serialize_secs")]
    pub total_elapsed: Duration,
}

impl BatchSummary {
    /// Mean wall-clock time per job.
    pub fn average(&self) -> Duration {
        match u32::try_from(self.total) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_elapsed / n,
        }
    }
}

/// Results of a batch, one per job in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub device: Device,
    pub summary: BatchSummary,
    pub results: Vec<GenerationResult>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0
    }
}

/// Drives the orchestrator over a sequence of jobs, one at a time.
pub struct BatchRunner<'o, 'a, B: Backend> {
    orchestrator: &'o GenerationOrchestrator<'a, B>,
    progress: ProgressBar,
}

impl<'o, 'a, B: Backend> BatchRunner<'o, 'a, B> {
    pub fn new(orchestrator: &'o GenerationOrchestrator<'a, B>) -> Self {
        Self {
            orchestrator,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on the given bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run every job in order. Failures are recorded, never retried, and do
    /// not stop the batch.
    pub fn run_batch(&self, jobs: &[GenerationJob<'_>], device: Device) -> BatchReport {
        let start = Instant::now();
        self.progress.set_length(jobs.len() as u64);

        let mut results = Vec::with_capacity(jobs.len());
        for (index, job) in jobs.iter().enumerate() {
            self.progress
                .set_message(format!("job {}/{}", index + 1, jobs.len()));

            let result = self
                .orchestrator
                .run(job, device)
                .unwrap_or_else(|e| GenerationResult::failed(job, e.to_string(), Duration::ZERO));

            results.push(result);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let summary = BatchSummary {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            total_elapsed: start.elapsed(),
        };

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            secs = summary.total_elapsed.as_secs_f64(),
            "Batch complete"
        );

        BatchReport {
            generated_at: Utc::now().to_rfc3339(),
            device,
            summary,
            results,
        }
    }
}
