//! Voice profile management.
//!
//! This module materializes reference clips into the directory the
//! synthesis engine reads and validates profiles before they are used.

mod store;

pub use store::{VoiceError, VoiceProfile, VoiceProfileStore};
