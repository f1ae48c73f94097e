//! Job files for batch runs.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur when reading a job file.
#[derive(Error, Debug)]
pub enum JobFileError {
    #[error("Job file not found: {0}")]
    NotFound(PathBuf),

    #[error("No text found in job file: {0}")]
    Empty(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const SAMPLE_TEXTS: [&str; 8] = [
    "Hello, this is a test of my cloned voice.",
    "The quick brown fox jumps over the lazy dog.",
    "I'm experimenting with different voice cloning technologies.",
    "This sentence tests how well the model handles longer phrases with multiple clauses.",
    "Short test.",
    "How are you doing today? I hope you're having a wonderful time!",
    "Voice cloning technology has advanced significantly in recent years.",
    "Let's see how this sounds with some technical terminology and acronyms like AI, ML, and TTS.",
];

/// Parse job text: one job per line, trimmed, blank lines skipped.
pub fn parse_jobs(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a job file. An empty file is an error.
pub fn read_job_file(path: &Path) -> Result<Vec<String>, JobFileError> {
    if !path.exists() {
        return Err(JobFileError::NotFound(path.to_path_buf()));
    }

    let jobs = parse_jobs(&std::fs::read_to_string(path)?);
    if jobs.is_empty() {
        return Err(JobFileError::Empty(path.to_path_buf()));
    }

    Ok(jobs)
}

/// Write the sample sentences, one per line. Returns how many were written.
pub fn write_sample_file(path: &Path) -> Result<usize, JobFileError> {
    let mut contents = SAMPLE_TEXTS.join("\n");
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(SAMPLE_TEXTS.len())
}
