//! Deterministic artifact names.

use std::path::{Path, PathBuf};

/// File-name-safe slug of the first `max_chars` characters of `text`.
///
/// Keeps alphanumerics, spaces and underscores, trims, then turns spaces
/// into underscores.
pub fn slug(text: &str, max_chars: usize) -> String {
    let kept: String = text
        .chars()
        .take(max_chars)
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();

    kept.trim().replace(' ', "_")
}

/// Name for an ad-hoc generation without an explicit output.
pub fn generation_output(dir: &Path, text: &str, preset: &str) -> PathBuf {
    dir.join(format!("improved_{}_{preset}.wav", slug(text, 25)))
}

/// Name for the `index`-th (1-based) job of a batch.
pub fn batch_output(dir: &Path, index: usize, text: &str) -> PathBuf {
    dir.join(format!("{index:03}_{}.wav", slug(text, 20)))
}

/// Name for one preset of a comparison run.
pub fn comparison_output(dir: &Path, preset: &str) -> PathBuf {
    dir.join(format!("comparison_{preset}.wav"))
}
