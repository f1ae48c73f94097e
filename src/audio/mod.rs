//! Audio helpers: reference clip loading and waveform persistence.

mod wav;

pub use wav::{
    AudioError, DEFAULT_SAMPLE_RATE, ReferenceSample, SUPPORTED_EXTENSIONS, Waveform,
    is_supported_audio,
};
