//! The icon manifest: which files are generated for each platform.
//!
//! Every output file is described by one [`IconEntry`]. The standard
//! manifest holds 22 iOS, 7 Android and 15 Windows entries, in the order
//! they are processed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// Platform
// ============================================================================

/// A target platform, each with its own top-level output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Windows,
}

impl Platform {
    /// All platforms, in processing order.
    pub const ALL: [Platform; 3] = [Platform::Ios, Platform::Android, Platform::Windows];

    /// Name of the platform directory under the output root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Ios => "iOS",
            Self::Android => "Android",
            Self::Windows => "Windows",
        }
    }

    /// Resolves the subfolder an icon of `size` pixels is placed in.
    ///
    /// Only Android splits its icons into subfolders; the other platforms
    /// place every file directly in the platform directory.
    pub fn subfolder_for(self, size: u32) -> Result<Option<&'static str>, ConfigError> {
        match self {
            Self::Android => density_bucket(size).map(Some),
            Self::Ios | Self::Windows => Ok(None),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Maps an Android icon size to its density bucket folder.
///
/// The 512px store icon is not a density bucket but lives next to them
/// in `google-play`.
pub fn density_bucket(size: u32) -> Result<&'static str, ConfigError> {
    match size {
        36 => Ok("drawable-ldpi"),
        48 => Ok("drawable-mdpi"),
        72 => Ok("drawable-hdpi"),
        96 => Ok("drawable-xhdpi"),
        144 => Ok("drawable-xxhdpi"),
        192 => Ok("drawable-xxxhdpi"),
        512 => Ok("google-play"),
        _ => Err(ConfigError::UnmappedDensity { size }),
    }
}

// ============================================================================
// IconEntry
// ============================================================================

/// One output file: a square icon of `size` pixels named `<name>.png`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IconEntry {
    pub name: &'static str,
    pub platform: Platform,
    pub size: u32,
}

impl IconEntry {
    pub const fn new(platform: Platform, name: &'static str, size: u32) -> Self {
        Self {
            name,
            platform,
            size,
        }
    }

    /// Resolves the subfolder below the platform directory, if any.
    pub fn subfolder(&self) -> Result<Option<&'static str>, ConfigError> {
        self.platform.subfolder_for(self.size)
    }

    /// Returns the output file name, including the `.png` extension.
    pub fn file_name(&self) -> String {
        format!("{}.png", self.name)
    }
}

impl fmt::Display for IconEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}px)", self.platform, self.name, self.size)
    }
}

const fn ios(name: &'static str, size: u32) -> IconEntry {
    IconEntry::new(Platform::Ios, name, size)
}

const fn android(size: u32) -> IconEntry {
    IconEntry::new(Platform::Android, "icon", size)
}

const fn windows(name: &'static str, size: u32) -> IconEntry {
    IconEntry::new(Platform::Windows, name, size)
}

/// iPhone, iPad, Apple Watch and App Store artwork.
pub const IOS_ICONS: [IconEntry; 22] = [
    ios("Icon-Small", 29),
    ios("Icon-Small-40", 40),
    ios("Icon-Watch-Not-38mm", 48),
    ios("Icon-Small-50", 50),
    ios("Icon-Watch-Not-42mm", 55),
    ios("Icon", 57),
    ios("Icon-Small@2x", 58),
    ios("Icon-72", 72),
    ios("Icon-76", 76),
    ios("Icon-Small-40@2x", 80),
    ios("Icon-Small@3x", 87),
    ios("Icon-Watch-Long-42mm", 88),
    ios("Icon-Small-50@2x", 100),
    ios("Icon@2x", 114),
    ios("Icon-60@2x", 120),
    ios("Icon-72@2x", 144),
    ios("Icon-76@2x", 152),
    ios("Icon-Watch-Short-38mm", 172),
    ios("Icon-60@3x", 180),
    ios("Icon-Watch-Short-42mm", 196),
    ios("iTunesArtwork", 512),
    ios("iTunesArtwork@2x", 1024),
];

/// Launcher icons for each density bucket plus the Play Store icon.
pub const ANDROID_ICONS: [IconEntry; 7] = [
    android(36),
    android(48),
    android(72),
    android(96),
    android(144),
    android(192),
    android(512),
];

/// Square app icons and tiles. Wide tiles are not generated.
pub const WINDOWS_ICONS: [IconEntry; 15] = [
    windows("icon-100", 44),
    windows("icon-125", 55),
    windows("icon-150", 66),
    windows("icon-200", 88),
    windows("icon-400", 176),
    windows("small-tile-100", 71),
    windows("small-tile-125", 89),
    windows("small-tile-150", 107),
    windows("small-tile-200", 142),
    windows("small-tile-400", 284),
    windows("medium-tile-100", 150),
    windows("medium-tile-125", 188),
    windows("medium-tile-150", 225),
    windows("medium-tile-200", 300),
    windows("medium-tile-400", 600),
];

// ============================================================================
// IconManifest
// ============================================================================

/// An ordered list of icon entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconManifest {
    entries: Vec<IconEntry>,
}

impl Default for IconManifest {
    fn default() -> Self {
        Self::standard()
    }
}

impl IconManifest {
    /// The full manifest for all three platforms.
    pub fn standard() -> Self {
        let entries = IOS_ICONS
            .iter()
            .chain(ANDROID_ICONS.iter())
            .chain(WINDOWS_ICONS.iter())
            .copied()
            .collect();
        Self { entries }
    }

    /// Creates a manifest from custom entries.
    pub fn from_entries(entries: Vec<IconEntry>) -> Self {
        Self { entries }
    }

    /// Returns a manifest restricted to the given platforms, keeping order.
    ///
    /// An empty selection keeps every platform.
    pub fn filtered(&self, platforms: &[Platform]) -> Self {
        if platforms.is_empty() {
            return self.clone();
        }
        let entries = self
            .entries
            .iter()
            .filter(|e| platforms.contains(&e.platform))
            .copied()
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }

    /// Returns an iterator over the entries of one platform.
    pub fn for_platform(&self, platform: Platform) -> impl Iterator<Item = &IconEntry> {
        self.entries.iter().filter(move |e| e.platform == platform)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every entry resolves to a subfolder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in &self.entries {
            entry.subfolder()?;
        }
        Ok(())
    }

    /// Serializes the manifest to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a IconManifest {
    type Item = &'a IconEntry;
    type IntoIter = std::slice::Iter<'a, IconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
