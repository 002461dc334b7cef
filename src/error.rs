//! Error types for icon set generation.
//!
//! Errors are split by how far they reach:
//!
//! - [`InputError`] and [`ConfigError`] are fatal and abort a run before
//!   anything is written.
//! - [`OutputError`] belongs to a single manifest entry. It is recorded in the
//!   run report and the remaining entries are still processed.
//! - [`PipelineError`] wraps everything that can abort a whole run.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::export::ExportError;
use crate::resample::ResampleError;

// ============================================================================
// Input Errors
// ============================================================================

/// Which dimension of the source image fell below the minimum size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndersizedDimension {
    Both,
    Width,
    Height,
}

impl fmt::Display for UndersizedDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Both => f.write_str("width and height"),
            Self::Width => f.write_str("width"),
            Self::Height => f.write_str("height"),
        }
    }
}

/// The master image could not be used as a source.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unreadable source {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },

    #[error("source image is not square ({width}x{height})")]
    NotSquare { width: u32, height: u32 },

    #[error("source image {dimension} too small ({width}x{height}), must be at least {minimum}x{minimum} pixels")]
    TooSmall {
        width: u32,
        height: u32,
        minimum: u32,
        dimension: UndersizedDimension,
    },
}

// ============================================================================
// Config Errors
// ============================================================================

/// The icon manifest contains an entry that cannot be placed.
///
/// Never produced by the shipped manifest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no Android density bucket for size {size}")]
    UnmappedDensity { size: u32 },
}

// ============================================================================
// Output Errors
// ============================================================================

/// Producing or persisting a single output file failed.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Resample(#[from] ResampleError),

    #[error(transparent)]
    Encode(#[from] ExportError),
}

// ============================================================================
// Pipeline Errors
// ============================================================================

/// A failure that aborts a whole run before any file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{} output file(s) already exist, first: {}", paths.len(), first_path(paths))]
    Collision { paths: Vec<PathBuf> },
}

fn first_path(paths: &[PathBuf]) -> String {
    paths
        .first()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}
