//! On-disk voice profile cache.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::audio::is_supported_audio;

/// Errors that can occur during voice profile management.
#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("Voice profile not found: {0}")]
    ProfileNotFound(String),

    #[error("No supported audio files found in {0}")]
    EmptySource(PathBuf),

    #[error("Invalid voice name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A named set of reference clips in the engine's cache directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceProfile {
    pub name: String,
    pub directory: PathBuf,
    /// Reference clips, sorted by file name.
    pub samples: Vec<PathBuf>,
}

/// Manages the voice cache root, one subdirectory per profile name.
#[derive(Debug, Clone)]
pub struct VoiceProfileStore {
    root: PathBuf,
}

impl VoiceProfileStore {
    /// Create a store rooted at the engine's default cache location.
    pub fn new() -> Self {
        Self::with_root(Self::default_root())
    }

    /// Create a store with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// `~/.cache/tortoise/voices`, relative to the working directory when no
    /// home directory is known.
    pub fn default_root() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".cache")
            .join("tortoise")
            .join("voices")
    }

    /// Get the cache root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate a voice name.
    fn validate_name(name: &str) -> Result<(), VoiceError> {
        if name.is_empty() {
            return Err(VoiceError::InvalidName("Name cannot be empty".to_string()));
        }

        // Prevent path traversal
        if name.contains('/') || name.contains('\\') || name.contains("..") || name.starts_with('.')
        {
            return Err(VoiceError::InvalidName(format!(
                "'{name}' cannot contain path separators or start with '.'"
            )));
        }

        Ok(())
    }

    fn profile_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn staging_dir(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{name}.staging"))
    }

    /// Supported audio files directly inside `dir`, sorted by file name.
    fn list_audio(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_supported_audio(&path) {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Copy every supported clip from `source` into the cache for `name`,
    /// replacing whatever the profile held before.
    ///
    /// Individual copy failures are logged and skipped, and their partial
    /// copies removed. The previous profile is left untouched when nothing
    /// could be copied.
    pub fn materialize(&self, name: &str, source: &Path) -> Result<VoiceProfile, VoiceError> {
        Self::validate_name(name)?;

        let sources = Self::list_audio(source)?;
        if sources.is_empty() {
            return Err(VoiceError::EmptySource(source.to_path_buf()));
        }

        let staging = self.staging_dir(name);
        if staging.exists() {
            fs::remove_dir_all(&staging)?;
        }
        fs::create_dir_all(&staging)?;

        let mut copied = 0usize;
        let mut last_error = None;
        for src in &sources {
            let Some(file_name) = src.file_name() else {
                continue;
            };
            let dest = staging.join(file_name);
            match fs::copy(src, &dest) {
                Ok(_) => {
                    copied += 1;
                    debug!(file = %src.display(), "Copied reference clip");
                }
                Err(e) => {
                    warn!(file = %src.display(), error = %e, "Skipping reference clip");
                    // fs::copy may leave a truncated destination behind
                    if let Err(cleanup) = fs::remove_file(&dest)
                        && cleanup.kind() != ErrorKind::NotFound
                    {
                        let _ = fs::remove_dir_all(&staging);
                        return Err(VoiceError::Io(cleanup));
                    }
                    last_error = Some(e);
                }
            }
        }

        if copied == 0 {
            let _ = fs::remove_dir_all(&staging);
            return Err(match last_error {
                Some(e) => VoiceError::Io(e),
                None => VoiceError::EmptySource(source.to_path_buf()),
            });
        }

        self.swap_in(name, &staging)?;

        info!(voice = name, clips = copied, "Materialized voice profile");
        self.load(name)
    }

    /// Replace the profile directory with `staging`. The previous profile is
    /// moved aside first and restored if the swap fails.
    pub(super) fn swap_in(&self, name: &str, staging: &Path) -> Result<(), VoiceError> {
        let target = self.profile_dir(name);
        let previous = self.root.join(format!(".{name}.previous"));

        if previous.exists() {
            fs::remove_dir_all(&previous)?;
        }
        let had_previous = target.exists();
        if had_previous {
            fs::rename(&target, &previous)?;
        }

        if let Err(e) = fs::rename(staging, &target) {
            if had_previous {
                let _ = fs::rename(&previous, &target);
            }
            let _ = fs::remove_dir_all(staging);
            return Err(VoiceError::Io(e));
        }

        if had_previous && let Err(e) = fs::remove_dir_all(&previous) {
            warn!(dir = %previous.display(), error = %e, "Could not remove previous profile");
        }
        Ok(())
    }

    /// Load an existing profile from the cache.
    pub fn load(&self, name: &str) -> Result<VoiceProfile, VoiceError> {
        Self::validate_name(name)?;

        let directory = self.profile_dir(name);
        if !directory.is_dir() {
            return Err(VoiceError::ProfileNotFound(name.to_string()));
        }

        let samples = Self::list_audio(&directory)?;
        if samples.is_empty() {
            return Err(VoiceError::ProfileNotFound(name.to_string()));
        }

        Ok(VoiceProfile {
            name: name.to_string(),
            directory,
            samples,
        })
    }

    /// A profile is valid iff its directory exists and still holds at least
    /// one supported clip.
    pub fn validate(&self, profile: &VoiceProfile) -> bool {
        Self::list_audio(&profile.directory).is_ok_and(|files| !files.is_empty())
    }

    /// List every profile in the cache, sorted by name. Directories without
    /// supported clips are ignored.
    pub fn list(&self) -> Result<Vec<VoiceProfile>, VoiceError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut profiles = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if let Ok(profile) = self.load(&name) {
                profiles.push(profile);
            }
        }

        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }
}

impl Default for VoiceProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
