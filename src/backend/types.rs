//! Backend request/response types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::ReferenceSample;
use crate::device::Device;
use crate::preset::PresetParameters;

/// Errors surfaced by the synthesis engine.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported device: {0}")]
    UnsupportedDevice(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Health check response from the synthesis server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub cuda_available: bool,
    pub gpu: Option<String>,
    pub device: String,
}

/// Parameter payload sent alongside a synthesis call.
#[derive(Debug, Clone, Serialize)]
pub struct WireParameters {
    #[serde(flatten)]
    pub parameters: PresetParameters,
    pub half_precision: bool,
    pub autoregressive_batch_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// One synthesis invocation.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub text: String,
    pub reference_samples: Vec<ReferenceSample>,
    pub parameters: PresetParameters,
    pub device: Device,
    pub seed: Option<u64>,
}

impl SynthesisRequest {
    /// Create a new synthesis request.
    pub fn new(
        text: impl Into<String>,
        reference_samples: Vec<ReferenceSample>,
        parameters: PresetParameters,
        device: Device,
    ) -> Self {
        Self {
            text: text.into(),
            reference_samples,
            parameters,
            device,
            seed: None,
        }
    }

    /// Set a fixed seed for reproducible output.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Parameters as sent over the wire.
    pub fn wire_parameters(&self) -> WireParameters {
        WireParameters {
            parameters: self.parameters,
            half_precision: self.device.supports_half_precision(),
            autoregressive_batch_size: self.device.autoregressive_batch_size(),
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::PresetRegistry;

    fn parameters() -> PresetParameters {
        PresetRegistry::new().get("fast").unwrap().parameters
    }

    #[test]
    fn test_synthesis_request_defaults() {
        let request = SynthesisRequest::new("Hello", vec![], parameters(), Device::Cpu);

        assert_eq!(request.text, "Hello");
        assert_eq!(request.seed, None);
        assert!(request.reference_samples.is_empty());
    }

    #[test]
    fn test_wire_parameters_serialize() {
        let request = SynthesisRequest::new("Hello", vec![], parameters(), Device::Cuda)
            .with_seed(Some(42));

        let json = serde_json::to_value(request.wire_parameters()).unwrap();

        assert_eq!(json["engine_preset"], "fast");
        assert_eq!(json["num_autoregressive_samples"], 16);
        assert_eq!(json["diffusion_iterations"], 30);
        assert_eq!(json["half_precision"], true);
        assert_eq!(json["autoregressive_batch_size"], 4);
        assert_eq!(json["seed"], 42);
    }

    #[test]
    fn test_wire_parameters_omit_missing_seed() {
        let request = SynthesisRequest::new("Hello", vec![], parameters(), Device::Cpu);

        let json = serde_json::to_value(request.wire_parameters()).unwrap();

        assert!(json.get("seed").is_none());
        assert_eq!(json["half_precision"], false);
        assert_eq!(json["autoregressive_batch_size"], 1);
    }

    #[test]
    fn test_health_response_deserialize() {
        let json = r#"{
            "status": "healthy",
            "model": "tortoise",
            "cuda_available": true,
            "gpu": "NVIDIA RTX 5060",
            "device": "cuda:0"
        }"#;

        let response: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "healthy");
        assert!(response.cuda_available);
        assert_eq!(response.gpu, Some("NVIDIA RTX 5060".to_string()));
    }
}
