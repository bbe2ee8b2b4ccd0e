use crate::core::{ExtError, ExtResult};
use std::fmt;
use std::str::FromStr;

/// A target package format for conversion.
///
/// Chrome and Edge are Chromium-style directory targets; Firefox is a
/// zip-based archive target (`.xpi`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetFormat {
    Chrome,
    Edge,
    Firefox,
}

impl TargetFormat {
    /// All supported target formats
    pub const ALL: &'static [TargetFormat] =
        &[TargetFormat::Chrome, TargetFormat::Edge, TargetFormat::Firefox];

    /// Lowercase name, used as the output subdirectory per target
    pub fn name(&self) -> &'static str {
        match self {
            TargetFormat::Chrome => "chrome",
            TargetFormat::Edge => "edge",
            TargetFormat::Firefox => "firefox",
        }
    }

    /// Whether this target's installable artifact is a single archive
    /// file rather than a plain directory
    pub fn is_archive(&self) -> bool {
        matches!(self, TargetFormat::Firefox)
    }

    /// File extension of the archive artifact, if any
    pub fn archive_extension(&self) -> Option<&'static str> {
        match self {
            TargetFormat::Firefox => Some("xpi"),
            _ => None,
        }
    }

    /// Highest manifest_version the target installs without signing
    /// workarounds. Chromium targets take manifests as-is (upgrading is
    /// not mechanically safe, so none is forced).
    pub fn max_manifest_version(&self) -> Option<u64> {
        match self {
            TargetFormat::Firefox => Some(2),
            _ => None,
        }
    }

    /// Store search URL for a display name in this target's ecosystem
    pub fn store_search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query);
        match self {
            TargetFormat::Firefox => format!(
                "https://addons.mozilla.org/en-US/firefox/search/?q={}",
                encoded
            ),
            TargetFormat::Chrome | TargetFormat::Edge => {
                format!("https://chromewebstore.google.com/search/{}", encoded)
            }
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TargetFormat {
    type Err = ExtError;

    fn from_str(s: &str) -> ExtResult<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(TargetFormat::Chrome),
            "edge" => Ok(TargetFormat::Edge),
            "firefox" => Ok(TargetFormat::Firefox),
            other => Err(ExtError::Config(format!(
                "Invalid target browser '{}'. Supported targets: chrome, edge, firefox",
                other
            ))),
        }
    }
}
