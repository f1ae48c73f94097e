//! CLI argument definitions and parsing.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::backend::DEFAULT_PORT;
use crate::device::{Device, DeviceSelector};
use crate::preset::DEFAULT_PRESET;

/// Voice-cloned speech generation with quality/speed presets.
#[derive(Parser, Debug)]
#[command(name = "preset-tts")]
#[command(about = "Voice-cloned speech generation with quality/speed presets")]
#[command(version)]
pub struct Args {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Voice profile cache root [default: ~/.cache/tortoise/voices]
    #[arg(long, global = true, env = "PRESET_TTS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Synthesis server host
    #[arg(long, global = true, env = "PRESET_TTS_HOST", default_value = "localhost")]
    pub host: String,

    /// Synthesis server port
    #[arg(long, global = true, env = "PRESET_TTS_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Compute device; "auto" probes CUDA, then MPS, then falls back to CPU
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub device: DeviceChoice,

    /// Fixed seed for reproducible output
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synthesize one text
    Generate {
        /// Text to synthesize
        text: String,

        /// Quality preset
        #[arg(short, long, default_value = DEFAULT_PRESET)]
        preset: String,

        /// Voice profile name
        #[arg(long, default_value = "target_voice")]
        voice: String,

        /// Output audio file [default: improved_<text>_<preset>.wav]
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Synthesize every line of a job file with one preset
    Batch {
        /// Text file with one job per line
        job_file: PathBuf,

        /// Quality preset
        #[arg(short, long, default_value = DEFAULT_PRESET)]
        preset: String,

        /// Voice profile name
        #[arg(long, default_value = "target_voice")]
        voice: String,

        /// Directory for generated audio
        #[arg(long, default_value = "batch_output")]
        output_dir: PathBuf,

        /// JSON results file
        #[arg(long, default_value = "batch_results.json")]
        report: PathBuf,
    },

    /// Synthesize one text with several presets for side-by-side listening
    Compare {
        /// Text to synthesize
        text: String,

        /// Presets to compare, comma separated [default: all]
        #[arg(short, long, value_delimiter = ',')]
        presets: Vec<String>,

        /// Voice profile name
        #[arg(long, default_value = "target_voice")]
        voice: String,

        /// Directory for generated audio
        #[arg(long, default_value = "comparison_output")]
        output_dir: PathBuf,

        /// JSON results file
        #[arg(long, default_value = "comparison_results.json")]
        report: PathBuf,
    },

    /// Show available presets
    ListPresets,

    /// Write a sample job file for batch runs
    CreateSamples {
        #[arg(default_value = "sample_texts.txt")]
        file: PathBuf,
    },

    /// Manage voice profiles
    #[command(subcommand)]
    Voice(VoiceCommand),

    /// Check the synthesis server and the local compute device
    Status,
}

#[derive(Subcommand, Debug)]
pub enum VoiceCommand {
    /// Copy reference clips from a directory into the cache
    Materialize {
        /// Voice profile name
        name: String,

        /// Directory with preprocessed reference clips
        source: PathBuf,
    },

    /// Show a voice profile
    Show { name: String },

    /// List cached voice profiles
    List,
}

/// Device selection on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceChoice {
    #[default]
    Auto,
    Cuda,
    Mps,
    Cpu,
}

impl DeviceChoice {
    /// Resolve to a concrete device, probing only for `Auto`.
    pub fn resolve(&self, selector: &DeviceSelector) -> Device {
        match self {
            DeviceChoice::Auto => selector.detect(),
            DeviceChoice::Cuda => Device::Cuda,
            DeviceChoice::Mps => Device::Mps,
            DeviceChoice::Cpu => Device::Cpu,
        }
    }
}
