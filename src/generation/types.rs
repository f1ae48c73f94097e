//! Jobs, results and errors of the generation layer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::audio::AudioError;
use crate::backend::BackendError;
use crate::preset::Preset;
use crate::voice::VoiceProfile;

/// Precondition violations. These abort a job before the engine is touched.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Text to synthesize cannot be empty")]
    EmptyText,

    #[error("Invalid voice profile '{0}': reference directory is missing or has no audio")]
    InvalidProfile(String),
}

/// Anything that goes wrong once a job is past its preconditions.
///
/// Never propagated: the orchestrator turns it into a failed [`Outcome`].
#[derive(Error, Debug)]
pub enum SynthesisFailure {
    #[error("Engine failure: {0}")]
    Engine(#[from] BackendError),

    #[error("Audio IO error: {0}")]
    Audio(#[from] AudioError),
}

/// One synthesis request against a voice profile.
#[derive(Debug, Clone)]
pub struct GenerationJob<'a> {
    pub text: String,
    pub preset: &'static Preset,
    pub profile: &'a VoiceProfile,
    /// Explicit artifact path; a name derived from text and preset otherwise.
    pub output: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl<'a> GenerationJob<'a> {
    pub fn new(text: impl Into<String>, preset: &'static Preset, profile: &'a VoiceProfile) -> Self {
        Self {
            text: text.into(),
            preset,
            profile,
            output: None,
            seed: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded { output: PathBuf },
    Failed { diagnostic: String },
}

/// Immutable record of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResult {
    pub text: String,
    pub preset: &'static str,
    pub voice: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    #[serde(rename = "elapsed_secs", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl GenerationResult {
    pub(crate) fn succeeded(job: &GenerationJob<'_>, output: PathBuf, elapsed: Duration) -> Self {
        Self::from_job(job, Outcome::Succeeded { output }, elapsed)
    }

    pub(crate) fn failed(
        job: &GenerationJob<'_>,
        diagnostic: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self::from_job(
            job,
            Outcome::Failed {
                diagnostic: diagnostic.into(),
            },
            elapsed,
        )
    }

    fn from_job(job: &GenerationJob<'_>, outcome: Outcome, elapsed: Duration) -> Self {
        Self {
            text: job.text.clone(),
            preset: job.preset.id,
            voice: job.profile.name.clone(),
            outcome,
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded { .. })
    }

    /// Artifact path, present iff the job succeeded.
    pub fn output(&self) -> Option<&Path> {
        match &self.outcome {
            Outcome::Succeeded { output } => Some(output),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Succeeded { .. } => None,
            Outcome::Failed { diagnostic } => Some(diagnostic),
        }
    }
}

pub(crate) fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
