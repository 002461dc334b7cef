use std::path::{Path, PathBuf};
use std::process::ExitCode;

use app_iconset::{
    EntryOutcome, FsSink, GenerationProfile, IconGenerator, IconManifest, OnCollision,
    PipelineError, Platform, ProfileError, ResampleOptions, RunOutcome, RunReport,
};
use clap::{Parser, ValueEnum};

/// Generate iOS, Android and Windows app icons from one square master PNG.
#[derive(Parser)]
#[command(name = "app-iconset")]
#[command(version, long_about = None)]
struct Cli {
    /// Master icon, a square PNG of at least 1024x1024 pixels
    #[arg(required_unless_present = "list")]
    source: Option<PathBuf>,

    /// Directory the icon folders are written to. Omitting it cancels the run
    output: Option<PathBuf>,

    /// What to do with output files that already exist
    #[arg(long, value_enum)]
    on_collision: Option<CollisionArg>,

    /// Only generate icons for this platform (repeatable)
    #[arg(long = "platform", value_enum)]
    platforms: Vec<PlatformArg>,

    /// Load settings from a JSON profile; flags override it
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Skip the sharpening pass after resampling
    #[arg(long)]
    no_sharpen: bool,

    /// Write the run report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the icon manifest as JSON and exit
    #[arg(long)]
    list: bool,

    /// Suppress progress output (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CollisionArg {
    Overwrite,
    Skip,
    Abort,
}

impl From<CollisionArg> for OnCollision {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Overwrite => Self::Overwrite,
            CollisionArg::Skip => Self::Skip,
            CollisionArg::Abort => Self::Abort,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Ios,
    Android,
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Self::Ios,
            PlatformArg::Android => Self::Android,
            PlatformArg::Windows => Self::Windows,
        }
    }
}

/// Every entry succeeded, the run was cancelled, or nothing was requested.
const EXIT_SUCCESS: u8 = 0;
/// Nothing was written.
const EXIT_FATAL: u8 = 1;
/// Some entries were written, some failed.
const EXIT_PARTIAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if cli.list {
        return list_manifest();
    }

    let profile = match build_profile(&cli) {
        Ok(profile) => profile,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::from(EXIT_FATAL);
        }
    };

    // `required_unless_present` guarantees a source unless listing.
    let Some(source) = cli.source.as_deref() else {
        return ExitCode::from(EXIT_FATAL);
    };

    let mut generator = IconGenerator::new(profile);
    let result = generator.run(source, cli.output.as_deref(), &FsSink);
    match &result {
        Ok(RunOutcome::Cancelled) => {
            eprintln!("cancelled: no output directory given, nothing was written");
        }
        Ok(RunOutcome::Finished(report)) => finish(report, cli.report.as_deref()),
        Err(err) => {
            log::error!("{}", err);
            eprintln!("Error: {err}. Nothing was written.");
        }
    }

    ExitCode::from(exit_code(&result))
}

/// Maps a run result to the process exit status.
fn exit_code(result: &Result<RunOutcome, PipelineError>) -> u8 {
    match result {
        Ok(RunOutcome::Cancelled) => EXIT_SUCCESS,
        Ok(RunOutcome::Finished(report)) if report.has_failures() => EXIT_PARTIAL,
        Ok(RunOutcome::Finished(_)) => EXIT_SUCCESS,
        Err(_) => EXIT_FATAL,
    }
}

fn build_profile(cli: &Cli) -> Result<GenerationProfile, ProfileError> {
    let mut profile = match &cli.profile {
        Some(path) => GenerationProfile::load(path)?,
        None => GenerationProfile::new(),
    };

    if let Some(on_collision) = cli.on_collision {
        profile = profile.with_on_collision(on_collision.into());
    }
    if !cli.platforms.is_empty() {
        profile = profile.with_platforms(cli.platforms.iter().map(|&p| p.into()).collect());
    }
    if cli.no_sharpen {
        profile = profile.with_resample(ResampleOptions::without_sharpening());
    }

    Ok(profile)
}

fn list_manifest() -> ExitCode {
    match IconManifest::standard().to_json_pretty() {
        Ok(json) => {
            println!("{json}");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(err) => {
            log::error!("Failed to serialize manifest: {}", err);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn write_report(report: &RunReport, path: &Path) -> Result<(), String> {
    let json = report.to_json_pretty().map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())
}

fn finish(report: &RunReport, report_path: Option<&Path>) {
    if let Some(path) = report_path {
        if let Err(err) = write_report(report, path) {
            log::warn!("Failed to write report to {}: {}", path.display(), err);
        }
    }

    if !report.has_failures() {
        eprintln!("Success: {report}");
        return;
    }

    eprintln!("Partial failure: {report}");
    for failure in report.failures() {
        if let EntryOutcome::Failed(err) = &failure.outcome {
            eprintln!("  {}: {}", failure.entry, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_iconset::{EntryResult, IconEntry, InputError, OutputError};

    fn entry_result(outcome: EntryOutcome) -> EntryResult {
        EntryResult {
            entry: IconEntry::new(Platform::Ios, "Icon", 57),
            path: PathBuf::from("out/iOS/Icon.png"),
            outcome,
        }
    }

    fn report(outcomes: Vec<EntryOutcome>) -> RunReport {
        RunReport {
            entries: outcomes.into_iter().map(entry_result).collect(),
        }
    }

    fn write_failure() -> EntryOutcome {
        EntryOutcome::Failed(OutputError::Write {
            path: PathBuf::from("out/iOS/Icon.png"),
            source: std::io::Error::other("disk full"),
        })
    }

    #[test]
    fn cancelled_run_exits_zero() {
        assert_eq!(exit_code(&Ok(RunOutcome::Cancelled)), EXIT_SUCCESS);
    }

    #[test]
    fn clean_run_exits_zero() {
        let done = report(vec![EntryOutcome::Written, EntryOutcome::Skipped]);
        assert_eq!(exit_code(&Ok(RunOutcome::Finished(done))), EXIT_SUCCESS);
    }

    #[test]
    fn fatal_error_exits_one() {
        let err = PipelineError::Input(InputError::NotSquare {
            width: 1024,
            height: 2048,
        });
        assert_eq!(exit_code(&Err(err)), EXIT_FATAL);
    }

    #[test]
    fn partial_failure_exits_two() {
        let partial = report(vec![EntryOutcome::Written, write_failure()]);
        assert_eq!(exit_code(&Ok(RunOutcome::Finished(partial))), EXIT_PARTIAL);
    }

    #[test]
    fn flags_override_profile_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let saved = GenerationProfile::new()
            .with_on_collision(OnCollision::Skip)
            .with_platforms(vec![Platform::Windows]);
        std::fs::write(&path, saved.to_json_pretty().unwrap()).unwrap();
        let profile_arg = path.to_str().unwrap();

        let cli =
            Cli::try_parse_from(["app-iconset", "master.png", "--profile", profile_arg]).unwrap();
        let loaded = build_profile(&cli).unwrap();
        assert_eq!(loaded, saved);

        let cli = Cli::try_parse_from([
            "app-iconset",
            "master.png",
            "--profile",
            profile_arg,
            "--on-collision",
            "abort",
            "--platform",
            "ios",
            "--platform",
            "android",
            "--no-sharpen",
        ])
        .unwrap();
        let profile = build_profile(&cli).unwrap();
        assert_eq!(profile.on_collision, OnCollision::Abort);
        assert_eq!(profile.platforms, vec![Platform::Ios, Platform::Android]);
        assert_eq!(profile.resample, ResampleOptions::without_sharpening());
    }

    #[test]
    fn missing_profile_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["app-iconset", "master.png", "--profile", "no/such/profile.json"])
                .unwrap();
        assert!(matches!(build_profile(&cli), Err(ProfileError::Io { .. })));
    }

    #[test]
    fn source_is_required_unless_listing() {
        assert!(Cli::try_parse_from(["app-iconset"]).is_err());
        assert!(Cli::try_parse_from(["app-iconset", "--list"]).unwrap().list);
    }

    #[test]
    fn report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_report(&report(vec![EntryOutcome::Written, write_failure()]), &path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["outcome"]["status"], "written");
        assert_eq!(entries[1]["outcome"]["status"], "failed");
        assert!(entries[1]["outcome"]["reason"].as_str().unwrap().contains("disk full"));
    }
}
