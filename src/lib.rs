//! app-iconset: Platform app icon sets from a single master image
//!
//! This crate derives the PNG icons needed by iOS, Android and Windows apps
//! from one square master PNG (at least 1024x1024) and writes them into a
//! fixed directory layout:
//!
//! ```text
//! <root>/iOS/<name>.png                 22 files
//! <root>/Android/<bucket>/icon.png       7 files
//! <root>/Windows/<name>.png             15 files
//! ```
//!
//! Every icon is resampled from the original pixels with a sharpened bicubic
//! filter and encoded as RGBA PNG without metadata.
//!
//! # Example
//!
//! ```
//! use app_iconset::{IconManifest, LayoutPlanner, Platform};
//!
//! let manifest = IconManifest::standard();
//! assert_eq!(manifest.len(), 44);
//!
//! let planner = LayoutPlanner::new("icons");
//! let store_icon = manifest
//!     .for_platform(Platform::Android)
//!     .find(|e| e.size == 512)
//!     .unwrap();
//! let target = planner.plan(store_icon).unwrap();
//! assert!(target.path.ends_with("Android/google-play/icon.png"));
//! ```
//!
//! # Running the pipeline
//!
//! ```no_run
//! use std::path::Path;
//! use app_iconset::{FsSink, GenerationProfile, IconGenerator, OnCollision, RunOutcome};
//!
//! let profile = GenerationProfile::new().with_on_collision(OnCollision::Skip);
//! let mut generator = IconGenerator::new(profile);
//!
//! match generator.run(Path::new("master.png"), Some(Path::new("icons")), &FsSink) {
//!     Ok(RunOutcome::Finished(report)) if report.has_failures() => {
//!         for failure in report.failures() {
//!             eprintln!("{}: {:?}", failure.entry, failure.outcome);
//!         }
//!     }
//!     Ok(RunOutcome::Finished(report)) => println!("{report}"),
//!     Ok(RunOutcome::Cancelled) => println!("cancelled"),
//!     Err(err) => eprintln!("nothing was written: {err}"),
//! }
//! ```

mod error;
mod export;
mod icon;
mod layout;
mod manifest;
mod pipeline;
mod profile;
mod resample;

pub use error::{ConfigError, InputError, OutputError, PipelineError, UndersizedDimension};
pub use export::{ExportError, encode_png};
pub use icon::{MINIMUM_SOURCE_SIZE, SizePx, SourceImage};
pub use layout::{FsSink, LayoutPlanner, OnCollision, OutputSink, OutputTarget};
pub use manifest::{
    ANDROID_ICONS, IOS_ICONS, IconEntry, IconManifest, Platform, WINDOWS_ICONS, density_bucket,
};
pub use pipeline::{EntryOutcome, EntryResult, IconGenerator, PipelineState, RunOutcome, RunReport};
pub use profile::{GenerationProfile, ProfileError};
pub use resample::{ResampleError, ResampleOptions, SharpenSettings, resize, resize_rgba};
