//! Quality/speed presets.
//!
//! Presets are constant data defined at compile time. Lookup of an unknown
//! identifier is an error, never a silent fallback.

mod registry;

pub use registry::{DEFAULT_PRESET, Preset, PresetError, PresetParameters, PresetRegistry};
