//! Compiled-in preset catalog.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when resolving a preset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("Unknown preset '{name}'. Available: {available}")]
    Unknown { name: String, available: String },
}

/// Numeric knobs passed through to the synthesis engine untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetParameters {
    /// Engine-side preset name, or `None` to drive the engine with the
    /// explicit values below.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_preset: Option<&'static str>,
    pub num_autoregressive_samples: u32,
    pub diffusion_iterations: u32,
    pub temperature: f32,
    pub repetition_penalty: f32,
    pub length_penalty: f32,
}

/// A named quality/speed tradeoff point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub parameters: PresetParameters,
    /// Advisory quality rating out of 10.
    pub quality_score: u8,
    /// Advisory speed rating, higher is faster.
    pub speed_score: u8,
    pub use_case: &'static str,
}

impl Preset {
    /// Ten-star bar for the quality rating, e.g. `★★★★★★☆☆☆☆`.
    pub fn quality_bar(&self) -> String {
        let filled = usize::from(self.quality_score.min(10));
        format!("{}{}", "★".repeat(filled), "☆".repeat(10 - filled))
    }
}

/// Preset used when the caller names none.
pub const DEFAULT_PRESET: &str = "custom_optimized";

const fn params(
    engine_preset: Option<&'static str>,
    num_autoregressive_samples: u32,
    diffusion_iterations: u32,
    temperature: f32,
) -> PresetParameters {
    PresetParameters {
        engine_preset,
        num_autoregressive_samples,
        diffusion_iterations,
        temperature,
        repetition_penalty: 2.0,
        length_penalty: 1.0,
    }
}

// Fastest first.
static PRESETS: [Preset; 5] = [
    Preset {
        id: "ultra_fast",
        parameters: params(Some("ultra_fast"), 1, 5, 0.7),
        quality_score: 6,
        speed_score: 5,
        use_case: "Fastest generation (~30 seconds)",
    },
    Preset {
        id: "fast",
        parameters: params(Some("fast"), 16, 30, 0.8),
        quality_score: 7,
        speed_score: 4,
        use_case: "Fast with decent quality (~2 minutes)",
    },
    Preset {
        id: "custom_optimized",
        parameters: params(None, 128, 75, 0.75),
        quality_score: 8,
        speed_score: 3,
        use_case: "Optimized balance of speed/quality (~3 minutes)",
    },
    Preset {
        id: "standard",
        parameters: params(Some("standard"), 256, 100, 0.8),
        quality_score: 8,
        speed_score: 2,
        use_case: "Good balance (~5 minutes)",
    },
    Preset {
        id: "high_quality",
        parameters: params(Some("high_quality"), 512, 200, 0.7),
        quality_score: 9,
        speed_score: 1,
        use_case: "Best quality (~10 minutes)",
    },
];

/// Read-only lookup over the process-wide preset catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetRegistry;

impl PresetRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Look up a preset by identifier.
    pub fn get(&self, id: &str) -> Result<&'static Preset, PresetError> {
        PRESETS
            .iter()
            .find(|preset| preset.id == id)
            .ok_or_else(|| PresetError::Unknown {
                name: id.to_string(),
                available: self.ids().join(", "),
            })
    }

    /// All presets, fastest to slowest.
    pub fn list(&self) -> &'static [Preset] {
        &PRESETS
    }

    /// Resolve a list of identifiers, keeping registry order and dropping
    /// duplicates. Fails on the first unknown identifier.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<&'static Preset>, PresetError> {
        for id in ids {
            self.get(id.as_ref())?;
        }

        Ok(PRESETS
            .iter()
            .filter(|preset| ids.iter().any(|id| id.as_ref() == preset.id))
            .collect())
    }

    /// Registry position of a preset, used as a stable tie-breaker.
    pub fn position(&self, id: &str) -> Option<usize> {
        PRESETS.iter().position(|preset| preset.id == id)
    }

    fn ids(&self) -> Vec<&'static str> {
        PRESETS.iter().map(|preset| preset.id).collect()
    }
}
