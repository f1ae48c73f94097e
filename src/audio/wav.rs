//! WAV encoding and reference sample loading.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use thiserror::Error;

/// Extensions the synthesis engine accepts as reference audio.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["wav", "mp3", "flac"];

/// Output sample rate of the synthesis engine.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Errors that can occur while reading or writing audio.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Waveform has no samples")]
    Empty,
}

/// Whether a path carries a supported audio extension.
pub fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Mono audio produced by the synthesis engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Decode WAV bytes, downmixing multi-channel audio to mono.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        let mut reader = WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let interleaved: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            SampleFormat::Int => {
                let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<Result<_, _>>()?
            }
        };

        let samples = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();

        Ok(Self::new(samples, spec.sample_rate))
    }

    /// Write as 16-bit PCM. A partially written file is removed on error.
    pub fn write_wav(&self, path: &Path) -> Result<(), AudioError> {
        if self.samples.is_empty() {
            return Err(AudioError::Empty);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let result = self.write_pcm16(path);
        if result.is_err() {
            let _ = std::fs::remove_file(path);
        }
        result
    }

    fn write_pcm16(&self, path: &Path) -> Result<(), AudioError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec)?;

        for sample in &self.samples {
            let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
            writer.write_sample(scaled)?;
        }

        writer.finalize()?;
        Ok(())
    }
}

/// Raw bytes of one reference clip, handed to the engine as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSample {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl ReferenceSample {
    /// Read a reference clip from disk.
    pub fn load(path: &Path) -> Result<Self, AudioError> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reference.wav")
            .to_string();

        Ok(Self { file_name, data })
    }

    /// Read every clip in order.
    pub fn load_all(paths: &[PathBuf]) -> Result<Vec<Self>, AudioError> {
        paths.iter().map(|path| Self::load(path)).collect()
    }

    /// MIME type derived from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("mp3") => "audio/mpeg",
            Some("flac") => "audio/flac",
            _ => "audio/wav",
        }
    }
}
