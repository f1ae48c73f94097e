//! Communication with the speech-synthesis engine.
//!
//! Provides the trait the generation layer drives and an HTTP
//! implementation talking to a model server that keeps the weights resident.

mod client;
mod types;

pub use client::{DEFAULT_PORT, HttpBackend};
pub use types::{BackendError, HealthResponse, SynthesisRequest, WireParameters};

use crate::audio::Waveform;

/// Trait for the speech-synthesis engine.
///
/// The engine is heavyweight and not reentrant; callers issue at most one
/// `synthesize` call at a time.
#[cfg_attr(test, mockall::automock)]
pub trait Backend: Send + Sync {
    /// Check backend health status.
    fn health(&self) -> Result<HealthResponse, BackendError>;

    /// Synthesize speech from text.
    ///
    /// # Arguments
    /// * `request` - Text, reference clips, preset parameters and device
    ///
    /// # Returns
    /// The generated mono waveform
    fn synthesize(&self, request: &SynthesisRequest) -> Result<Waveform, BackendError>;
}

/// Create a backend for the given server address.
pub fn create_backend(host: &str, port: u16) -> Result<HttpBackend, BackendError> {
    HttpBackend::new(host, port)
}
