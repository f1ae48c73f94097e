//! Single synthesis call-site.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::audio::ReferenceSample;
use crate::backend::{Backend, SynthesisRequest};
use crate::device::Device;
use crate::voice::VoiceProfileStore;

use super::naming;
use super::types::{GenerationError, GenerationJob, GenerationResult, SynthesisFailure};

/// Runs one job against the engine and reports the outcome as data.
pub struct GenerationOrchestrator<'a, B: Backend> {
    backend: &'a B,
    store: &'a VoiceProfileStore,
    output_dir: PathBuf,
}

impl<'a, B: Backend> GenerationOrchestrator<'a, B> {
    /// Create an orchestrator writing default-named artifacts into `output_dir`.
    pub fn new(backend: &'a B, store: &'a VoiceProfileStore, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            store,
            output_dir: output_dir.into(),
        }
    }

    /// Run a job to completion.
    ///
    /// Returns `Err` only for precondition violations (empty text, invalid
    /// profile); the engine is not invoked in that case. Every failure after
    /// that point, including engine errors, comes back as a failed
    /// [`GenerationResult`].
    pub fn run(
        &self,
        job: &GenerationJob<'_>,
        device: Device,
    ) -> Result<GenerationResult, GenerationError> {
        if job.text.trim().is_empty() {
            return Err(GenerationError::EmptyText);
        }

        if !self.store.validate(job.profile) {
            return Err(GenerationError::InvalidProfile(job.profile.name.clone()));
        }

        let output = job
            .output
            .clone()
            .unwrap_or_else(|| naming::generation_output(&self.output_dir, &job.text, job.preset.id));

        info!(
            preset = job.preset.id,
            voice = %job.profile.name,
            %device,
            "Generating speech"
        );

        let start = Instant::now();
        let attempt = self.synthesize(job, device, &output);
        let elapsed = start.elapsed();

        let result = match attempt {
            Ok(()) => {
                info!(output = %output.display(), secs = elapsed.as_secs_f64(), "Speech generated");
                GenerationResult::succeeded(job, output, elapsed)
            }
            Err(failure) => {
                warn!(preset = job.preset.id, error = %failure, "Generation failed");
                GenerationResult::failed(job, failure.to_string(), elapsed)
            }
        };

        Ok(result)
    }

    fn synthesize(
        &self,
        job: &GenerationJob<'_>,
        device: Device,
        output: &Path,
    ) -> Result<(), SynthesisFailure> {
        let samples = ReferenceSample::load_all(&job.profile.samples)?;
        debug!(clips = samples.len(), "Loaded reference clips");

        let request = SynthesisRequest::new(job.text.clone(), samples, job.preset.parameters, device)
            .with_seed(job.seed);

        let waveform = self.backend.synthesize(&request)?;
        debug!(audio_secs = waveform.duration_secs(), "Engine returned waveform");
        waveform.write_wav(output)?;

        Ok(())
    }
}
