//! Output layout: where each icon file goes.
//!
//! Files are placed as `root/<Platform>/[<subfolder>/]<name>.png`. The
//! [`LayoutPlanner`] computes these paths without touching the filesystem;
//! directories are created through an [`OutputSink`] right before a file is
//! written.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, OutputError};
use crate::manifest::IconEntry;

// ============================================================================
// OutputSink Trait
// ============================================================================

/// Destination for generated files.
///
/// The pipeline never touches the filesystem directly; it goes through a
/// sink so callers can redirect or intercept output.
pub trait OutputSink {
    /// Creates a directory and its parents. Succeeds if it already exists.
    fn create_dir(&self, dir: &Path) -> io::Result<()>;

    /// Returns true if a file already exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Writes `bytes` to `path`, replacing any existing file.
    fn persist(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// An [`OutputSink`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn create_dir(&self, dir: &Path) -> io::Result<()> {
        // `create_dir_all` treats a directory created concurrently as success.
        std::fs::create_dir_all(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn persist(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(path, bytes)
    }
}

// ============================================================================
// Collision Policy
// ============================================================================

/// What to do when an output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnCollision {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Keep the existing file and record the entry as skipped.
    Skip,
    /// Refuse to start the run if any output file exists.
    Abort,
}

impl fmt::Display for OnCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => f.write_str("overwrite"),
            Self::Skip => f.write_str("skip"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

// ============================================================================
// OutputTarget
// ============================================================================

/// The planned location of one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Full path of the file.
    pub path: PathBuf,

    /// Directories to create, outermost first, ending with the file's parent.
    pub directory_chain: Vec<PathBuf>,
}

impl OutputTarget {
    /// Returns the directory the file is written into.
    pub fn parent(&self) -> Option<&Path> {
        self.directory_chain.last().map(PathBuf::as_path)
    }
}

// ============================================================================
// LayoutPlanner
// ============================================================================

/// Maps manifest entries to paths below an output root.
#[derive(Debug, Clone)]
pub struct LayoutPlanner {
    root: PathBuf,
}

impl LayoutPlanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Computes the output path for an entry.
    ///
    /// Fails if the entry's subfolder cannot be resolved. Has no side effects.
    pub fn plan(&self, entry: &IconEntry) -> Result<OutputTarget, ConfigError> {
        let platform_dir = self.root.join(entry.platform.dir_name());
        let mut directory_chain = vec![platform_dir.clone()];

        let parent = match entry.subfolder()? {
            Some(subfolder) => {
                let dir = platform_dir.join(subfolder);
                directory_chain.push(dir.clone());
                dir
            }
            None => platform_dir,
        };

        Ok(OutputTarget {
            path: parent.join(entry.file_name()),
            directory_chain,
        })
    }

    /// Ensures every directory of the target's chain exists.
    pub fn prepare(&self, target: &OutputTarget, sink: &dyn OutputSink) -> Result<(), OutputError> {
        for dir in &target.directory_chain {
            sink.create_dir(dir).map_err(|source| OutputError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
