//! Same text across several presets.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::info;

use crate::backend::Backend;
use crate::device::Device;
use crate::preset::{Preset, PresetRegistry};
use crate::voice::VoiceProfile;

use super::naming;
use super::orchestrator::GenerationOrchestrator;
use super::types::{GenerationJob, GenerationResult, serialize_secs};

/// A succeeded entry in the elapsed-time ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub preset: &'static str,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub quality_score: u8,
}

/// Side-by-side results, exactly one entry per preset, in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub generated_at: String,
    pub text: String,
    pub voice: String,
    pub device: Device,
    pub entries: Vec<GenerationResult>,
    /// Succeeded entries only, fastest first.
    pub ranking: Vec<RankedEntry>,
}

impl ComparisonReport {
    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(GenerationResult::is_success)
    }
}

/// Rank succeeded results by elapsed time. Ties keep registry order.
pub fn rank(entries: &[GenerationResult]) -> Vec<RankedEntry> {
    let registry = PresetRegistry::new();

    let mut ranking: Vec<RankedEntry> = entries
        .iter()
        .filter(|entry| entry.is_success())
        .map(|entry| RankedEntry {
            preset: entry.preset,
            elapsed: entry.elapsed,
            quality_score: registry.get(entry.preset).map_or(0, |p| p.quality_score),
        })
        .collect();

    ranking.sort_by_key(|entry| (entry.elapsed, registry.position(entry.preset)));
    ranking
}

/// Runs one text against a set of presets through the orchestrator.
pub struct ComparisonReporter<'o, 'a, B: Backend> {
    orchestrator: &'o GenerationOrchestrator<'a, B>,
    output_dir: PathBuf,
    progress: ProgressBar,
}

impl<'o, 'a, B: Backend> ComparisonReporter<'o, 'a, B> {
    pub fn new(orchestrator: &'o GenerationOrchestrator<'a, B>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            orchestrator,
            output_dir: output_dir.into(),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report progress on the given bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run `text` once per preset. A failing preset stays in the report as a
    /// failed entry.
    pub fn compare(
        &self,
        text: &str,
        profile: &VoiceProfile,
        presets: &[&'static Preset],
        device: Device,
        seed: Option<u64>,
    ) -> ComparisonReport {
        let registry = PresetRegistry::new();
        let mut ordered = presets.to_vec();
        ordered.sort_by_key(|preset| registry.position(preset.id).unwrap_or(usize::MAX));
        ordered.dedup_by_key(|preset| preset.id);

        self.progress.set_length(ordered.len() as u64);

        let mut entries = Vec::with_capacity(ordered.len());
        for preset in ordered {
            self.progress.set_message(format!("preset {}", preset.id));

            let job = GenerationJob::new(text, preset, profile)
                .with_output(naming::comparison_output(&self.output_dir, preset.id))
                .with_seed(seed);

            let result = self
                .orchestrator
                .run(&job, device)
                .unwrap_or_else(|e| GenerationResult::failed(&job, e.to_string(), Duration::ZERO));

            entries.push(result);
            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        let ranking = rank(&entries);
        info!(
            presets = entries.len(),
            succeeded = ranking.len(),
            "Comparison complete"
        );

        ComparisonReport {
            generated_at: Utc::now().to_rfc3339(),
            text: text.to_string(),
            voice: profile.name.clone(),
            device,
            entries,
            ranking,
        }
    }
}
