//! Compute device selection.

mod selector;

pub use selector::{Device, DeviceProbe, DeviceSelector, SystemProbe, ThroughputClass};
