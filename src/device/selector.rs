//! Compute backend detection.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

/// Compute backend the synthesis engine should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Discrete accelerator (CUDA).
    Cuda,
    /// Unified-memory accelerator (Apple MPS).
    Mps,
    /// CPU only.
    Cpu,
}

impl Device {
    /// Identifier understood by the synthesis engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cuda => "cuda",
            Device::Mps => "mps",
            Device::Cpu => "cpu",
        }
    }

    /// Whether the engine should load weights at half precision.
    pub fn supports_half_precision(&self) -> bool {
        matches!(self, Device::Cuda | Device::Mps)
    }

    /// Autoregressive batch size the engine should use on this device.
    pub fn autoregressive_batch_size(&self) -> u32 {
        match self {
            Device::Cuda | Device::Mps => 4,
            Device::Cpu => 1,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory throughput class. Only used for user-facing time estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThroughputClass {
    Fast,
    Moderate,
    Slow,
}

impl fmt::Display for ThroughputClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ThroughputClass::Fast => "fast",
            ThroughputClass::Moderate => "moderate",
            ThroughputClass::Slow => "slow",
        };
        f.write_str(label)
    }
}

/// Read-only hardware probe.
///
/// Implementations must not mutate any state; they are consulted at most
/// once per [`DeviceSelector`].
pub trait DeviceProbe: Send + Sync {
    fn cuda_available(&self) -> bool;
    fn mps_available(&self) -> bool;
}

/// Probe backed by the host operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl DeviceProbe for SystemProbe {
    fn cuda_available(&self) -> bool {
        if std::env::var("CUDA_VISIBLE_DEVICES").is_ok_and(|v| v.trim() == "-1") {
            return false;
        }

        Path::new("/proc/driver/nvidia/version").exists() || Path::new("/dev/nvidia0").exists()
    }

    fn mps_available(&self) -> bool {
        cfg!(all(target_os = "macos", target_arch = "aarch64"))
    }
}

/// Picks the preferred compute backend: CUDA, then MPS, else CPU.
pub struct DeviceSelector {
    probe: Box<dyn DeviceProbe>,
    detected: OnceLock<Device>,
}

impl DeviceSelector {
    /// Create a selector that probes the host.
    pub fn new() -> Self {
        Self::with_probe(SystemProbe)
    }

    /// Create a selector with a custom probe.
    pub fn with_probe(probe: impl DeviceProbe + 'static) -> Self {
        Self {
            probe: Box::new(probe),
            detected: OnceLock::new(),
        }
    }

    /// Detect the preferred device. Never fails; the result is cached for
    /// the lifetime of the selector.
    pub fn detect(&self) -> Device {
        *self.detected.get_or_init(|| {
            let device = if self.probe.cuda_available() {
                Device::Cuda
            } else if self.probe.mps_available() {
                Device::Mps
            } else {
                Device::Cpu
            };
            debug!(%device, "Detected compute device");
            device
        })
    }

    /// Advisory throughput class for a device.
    pub fn expected_class(device: Device) -> ThroughputClass {
        match device {
            Device::Cuda => ThroughputClass::Fast,
            Device::Mps => ThroughputClass::Moderate,
            Device::Cpu => ThroughputClass::Slow,
        }
    }
}

impl Default for DeviceSelector {
    fn default() -> Self {
        Self::new()
    }
}
