//! preset-tts-rs: voice-cloned speech generation with quality/speed presets.
//!
//! This crate orchestrates a voice-cloning synthesis server: it resolves a
//! preset, picks a compute device, manages cached voice profiles and runs
//! single, batch and multi-preset comparison generations.

pub mod audio;
pub mod backend;
pub mod cli;
pub mod device;
pub mod generation;
pub mod preset;
pub mod voice;
