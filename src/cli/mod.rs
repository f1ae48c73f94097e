//! CLI argument parsing and job files.

mod args;
mod jobs;

pub use args::{Args, Command, DeviceChoice, VoiceCommand};
pub use jobs::{JobFileError, parse_jobs, read_job_file, write_sample_file};
