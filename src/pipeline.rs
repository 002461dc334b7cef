//! Icon set generation pipeline.
//!
//! [`IconGenerator`] drives a run: it validates the master image once, plans
//! every output path, then resizes, encodes and writes one icon per manifest
//! entry. Entry failures are collected into a [`RunReport`] instead of
//! stopping the run.
//!
//! # States
//!
//! ```text
//! Idle ──► Validating ──► Processing ──► Done
//!              │
//!              └────────► Failed
//! ```
//!
//! A run without an output root returns [`RunOutcome::Cancelled`] and stays
//! in `Idle`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::error::{OutputError, PipelineError};
use crate::export::encode_png;
use crate::icon::SourceImage;
use crate::layout::{LayoutPlanner, OnCollision, OutputSink, OutputTarget};
use crate::manifest::{IconEntry, IconManifest, Platform};
use crate::profile::GenerationProfile;
use crate::resample::resize;

// ============================================================================
// Run State
// ============================================================================

/// Where a generator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Validating,
    Processing,
    Done,
    Failed,
}

// ============================================================================
// Results
// ============================================================================

/// Outcome of a single manifest entry.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "kebab-case")]
pub enum EntryOutcome {
    Written,
    /// The file already existed and the collision policy is `Skip`.
    Skipped,
    Failed(#[serde(serialize_with = "serialize_display")] OutputError),
}

fn serialize_display<S: Serializer>(err: &OutputError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

impl EntryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// The result of processing one entry.
#[derive(Debug, Serialize)]
pub struct EntryResult {
    pub entry: IconEntry,
    pub path: PathBuf,
    pub outcome: EntryOutcome,
}

/// Per-entry results of a finished run, in manifest order.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub entries: Vec<EntryResult>,
}

impl RunReport {
    /// Number of entries processed.
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Written))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(EntryOutcome::is_failure)
    }

    /// Returns true if at least one entry failed.
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|r| r.outcome.is_failure())
    }

    /// Returns an iterator over the failed entries.
    pub fn failures(&self) -> impl Iterator<Item = &EntryResult> {
        self.entries.iter().filter(|r| r.outcome.is_failure())
    }

    /// Serializes the report to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn count(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} icons written", self.written(), self.total())?;
        if self.skipped() > 0 {
            write!(f, ", {} skipped", self.skipped())?;
        }
        if self.failed() > 0 {
            write!(f, ", {} failed", self.failed())?;
        }
        Ok(())
    }
}

/// How a run ended, when it did not fail before processing.
#[derive(Debug)]
pub enum RunOutcome {
    /// No output root was given. Nothing was read or written.
    Cancelled,
    /// Every entry was processed. The report may still contain failures.
    Finished(RunReport),
}

// ============================================================================
// IconGenerator
// ============================================================================

/// Generates platform icon sets from one master image.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use app_iconset::{FsSink, GenerationProfile, IconGenerator, RunOutcome};
///
/// let mut generator = IconGenerator::new(GenerationProfile::new());
/// let outcome = generator
///     .run(Path::new("master.png"), Some(Path::new("icons")), &FsSink)
///     .unwrap();
///
/// if let RunOutcome::Finished(report) = outcome {
///     println!("{report}");
/// }
/// ```
pub struct IconGenerator {
    manifest: IconManifest,
    profile: GenerationProfile,
    state: PipelineState,
}

impl IconGenerator {
    /// Creates a generator for the standard manifest.
    pub fn new(profile: GenerationProfile) -> Self {
        Self::with_manifest(IconManifest::standard(), profile)
    }

    /// Creates a generator for a custom manifest.
    pub fn with_manifest(manifest: IconManifest, profile: GenerationProfile) -> Self {
        Self {
            manifest,
            profile,
            state: PipelineState::Idle,
        }
    }

    pub fn profile(&self) -> &GenerationProfile {
        &self.profile
    }

    /// Returns the state reached by the last run.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns the manifest entries selected by the profile's platforms.
    pub fn selected_manifest(&self) -> IconManifest {
        self.manifest.filtered(&self.profile.platforms)
    }

    /// Loads the master image from `source_path` and generates every icon.
    ///
    /// The file is not opened when `output_root` is `None`.
    pub fn run(
        &mut self,
        source_path: &Path,
        output_root: Option<&Path>,
        sink: &dyn OutputSink,
    ) -> Result<RunOutcome, PipelineError> {
        self.state = PipelineState::Idle;
        let Some(root) = output_root else {
            log::info!("No output directory chosen, cancelled");
            return Ok(RunOutcome::Cancelled);
        };

        self.transition(PipelineState::Validating);
        let source = match SourceImage::open(source_path) {
            Ok(source) => source,
            Err(err) => return self.fail(err),
        };
        log::info!("Loaded {} ({}px)", source_path.display(), source.size());

        self.generate(&source, root, sink)
    }

    /// Generates every icon from an already loaded master image.
    pub fn run_image(
        &mut self,
        source: &SourceImage,
        output_root: Option<&Path>,
        sink: &dyn OutputSink,
    ) -> Result<RunOutcome, PipelineError> {
        self.state = PipelineState::Idle;
        let Some(root) = output_root else {
            log::info!("No output directory chosen, cancelled");
            return Ok(RunOutcome::Cancelled);
        };

        self.transition(PipelineState::Validating);
        self.generate(source, root, sink)
    }

    fn generate(
        &mut self,
        source: &SourceImage,
        root: &Path,
        sink: &dyn OutputSink,
    ) -> Result<RunOutcome, PipelineError> {
        let manifest = self.selected_manifest();
        let planner = LayoutPlanner::new(root);

        let mut planned = Vec::with_capacity(manifest.len());
        for entry in &manifest {
            match planner.plan(entry) {
                Ok(target) => planned.push((*entry, target)),
                Err(err) => return self.fail(err),
            }
        }

        if self.profile.on_collision == OnCollision::Abort {
            let existing: Vec<PathBuf> = planned
                .iter()
                .filter(|(_, target)| sink.exists(&target.path))
                .map(|(_, target)| target.path.clone())
                .collect();
            if !existing.is_empty() {
                return self.fail(PipelineError::Collision { paths: existing });
            }
        }

        self.transition(PipelineState::Processing);
        let mut report = RunReport::default();
        let mut current_platform: Option<Platform> = None;

        for (entry, target) in planned {
            if current_platform != Some(entry.platform) {
                log::info!("Generating {} icons", entry.platform);
                current_platform = Some(entry.platform);
            }

            let outcome = match self.process_entry(source, &planner, &entry, &target, sink) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::warn!("Failed to generate {}: {}", entry, err);
                    EntryOutcome::Failed(err)
                }
            };

            report.entries.push(EntryResult {
                entry,
                path: target.path,
                outcome,
            });
        }

        self.transition(PipelineState::Done);
        log::info!("{}", report);
        Ok(RunOutcome::Finished(report))
    }

    fn process_entry(
        &self,
        source: &SourceImage,
        planner: &LayoutPlanner,
        entry: &IconEntry,
        target: &OutputTarget,
        sink: &dyn OutputSink,
    ) -> Result<EntryOutcome, OutputError> {
        if self.profile.on_collision == OnCollision::Skip && sink.exists(&target.path) {
            log::warn!("Skipping {}, {} already exists", entry, target.path.display());
            return Ok(EntryOutcome::Skipped);
        }

        let icon = resize(source, entry.size, &self.profile.resample)?;
        let bytes = encode_png(&icon)?;

        planner.prepare(target, sink)?;
        sink.persist(&target.path, &bytes).map_err(|source| OutputError::Write {
            path: target.path.clone(),
            source,
        })?;

        log::debug!("Wrote {} ({} bytes)", target.path.display(), bytes.len());
        Ok(EntryOutcome::Written)
    }

    fn transition(&mut self, next: PipelineState) {
        log::debug!("Pipeline {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn fail<E: Into<PipelineError>>(&mut self, err: E) -> Result<RunOutcome, PipelineError> {
        self.transition(PipelineState::Failed);
        Err(err.into())
    }
}

// ============================================================================
// Tests
// ============================================================================
