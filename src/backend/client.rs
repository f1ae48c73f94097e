//! HTTP client for the synthesis server.

use reqwest::blocking::multipart::{Form, Part};

use crate::audio::Waveform;

use super::Backend;
use super::types::{BackendError, HealthResponse, SynthesisRequest};

/// Default port of the synthesis server.
pub const DEFAULT_PORT: u16 = 9290;

/// HTTP-based synthesis backend.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend client.
    ///
    /// The client has no request timeout: synthesis on slow presets can take
    /// many minutes.
    pub fn new(host: &str, port: u16) -> Result<Self, BackendError> {
        let base_url = format!("http://{host}:{port}");
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    /// Get the base URL for this backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_form(request: &SynthesisRequest) -> Result<Form, BackendError> {
        let parameters = serde_json::to_string(&request.wire_parameters())
            .map_err(|e| BackendError::RequestFailed(e.to_string()))?;

        let mut form = Form::new()
            .text("text", request.text.clone())
            .text("device", request.device.as_str())
            .text("parameters", parameters);

        for sample in &request.reference_samples {
            let part = Part::bytes(sample.data.clone())
                .file_name(sample.file_name.clone())
                .mime_str(sample.mime_type())
                .map_err(|e| BackendError::RequestFailed(e.to_string()))?;
            form = form.part("reference", part);
        }

        Ok(form)
    }
}

impl Backend for HttpBackend {
    fn health(&self) -> Result<HealthResponse, BackendError> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::RequestFailed(format!(
                "Status: {}",
                response.status()
            )));
        }

        response
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    fn synthesize(&self, request: &SynthesisRequest) -> Result<Waveform, BackendError> {
        let url = format!("{}/synthesize", self.base_url);
        let form = Self::build_form(request)?;

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| BackendError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 422 {
            let detail = response.text().unwrap_or_default();
            return Err(BackendError::UnsupportedDevice(format!(
                "{}: {detail}",
                request.device
            )));
        }

        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(BackendError::BackendError(format!("Status: {status} {detail}")));
        }

        let bytes = response
            .bytes()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        Waveform::from_wav_bytes(&bytes).map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}
