//! Serializable run configuration.
//!
//! A [`GenerationProfile`] captures every setting of a run in a form that can
//! be stored as JSON next to a project and loaded by the CLI.
//!
//! # Example
//!
//! ```
//! use app_iconset::{GenerationProfile, OnCollision, Platform};
//!
//! let profile = GenerationProfile::new()
//!     .with_on_collision(OnCollision::Skip)
//!     .with_platforms(vec![Platform::Ios, Platform::Android]);
//!
//! let json = profile.to_json().unwrap();
//! let restored = GenerationProfile::from_json(&json).unwrap();
//! assert_eq!(restored.on_collision, OnCollision::Skip);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::OnCollision;
use crate::manifest::Platform;
use crate::resample::ResampleOptions;

/// Errors produced while loading a profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("an error occurred while parsing the profile: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for one generation run.
///
/// # JSON Format
///
/// ```json
/// {
///   "onCollision": "overwrite",
///   "platforms": ["ios", "android", "windows"],
///   "resample": {
///     "sharpen": { "sigma": 0.5, "threshold": 2 }
///   }
/// }
/// ```
///
/// Every field is optional when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationProfile {
    /// Policy for output files that already exist.
    pub on_collision: OnCollision,

    /// Platforms to generate. Empty means all of them.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<Platform>,

    /// Resampling settings passed to every resize.
    pub resample: ResampleOptions,
}

impl GenerationProfile {
    /// Creates a profile with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the collision policy.
    pub fn with_on_collision(mut self, on_collision: OnCollision) -> Self {
        self.on_collision = on_collision;
        self
    }

    /// Restricts generation to the given platforms.
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    /// Sets resampling options.
    pub fn with_resample(mut self, resample: ResampleOptions) -> Self {
        self.resample = resample;
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }
}
