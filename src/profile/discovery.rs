use crate::core::path::home_dir;
use crate::core::{ExtError, ExtResult};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

/// A source browser whose installed extensions can be enumerated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Browser {
    Chrome,
    Firefox,
}

impl Browser {
    pub fn name(&self) -> &'static str {
        match self {
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }

    /// Directory inside a profile that holds installed extensions
    pub fn extensions_dir_name(&self) -> &'static str {
        match self {
            Browser::Chrome => "Extensions",
            Browser::Firefox => "extensions",
        }
    }

    /// Platform-specific user-data directory holding the profiles
    ///
    /// Chrome:
    /// - Windows: %LOCALAPPDATA%\Google\Chrome\User Data
    /// - Linux: ~/.config/google-chrome
    /// - macOS: ~/Library/Application Support/Google/Chrome
    ///
    /// Firefox:
    /// - Windows: %APPDATA%\Mozilla\Firefox\Profiles
    /// - Linux: ~/.mozilla/firefox
    /// - macOS: ~/Library/Application Support/Firefox/Profiles
    pub fn profiles_base_dir(&self) -> ExtResult<PathBuf> {
        match self {
            Browser::Chrome => {
                if cfg!(target_os = "windows") {
                    let local = dirs::data_local_dir().ok_or_else(|| {
                        ExtError::Path("Could not determine local data directory".to_string())
                    })?;
                    Ok(local.join("Google").join("Chrome").join("User Data"))
                } else if cfg!(target_os = "macos") {
                    let config = dirs::config_dir().ok_or_else(|| {
                        ExtError::Path("Could not determine config directory".to_string())
                    })?;
                    Ok(config.join("Google").join("Chrome"))
                } else {
                    let config = dirs::config_dir().ok_or_else(|| {
                        ExtError::Path("Could not determine config directory".to_string())
                    })?;
                    Ok(config.join("google-chrome"))
                }
            }
            Browser::Firefox => {
                if cfg!(target_os = "windows") {
                    let roaming = dirs::config_dir().ok_or_else(|| {
                        ExtError::Path("Could not determine config directory".to_string())
                    })?;
                    Ok(roaming.join("Mozilla").join("Firefox").join("Profiles"))
                } else if cfg!(target_os = "macos") {
                    let config = dirs::config_dir().ok_or_else(|| {
                        ExtError::Path("Could not determine config directory".to_string())
                    })?;
                    Ok(config.join("Firefox").join("Profiles"))
                } else {
                    Ok(home_dir()?.join(".mozilla").join("firefox"))
                }
            }
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Browser {
    type Err = ExtError;

    fn from_str(s: &str) -> ExtResult<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(Browser::Chrome),
            "firefox" => Ok(Browser::Firefox),
            other => Err(ExtError::Config(format!(
                "Unsupported source browser '{}'. Supported browsers: chrome, firefox",
                other
            ))),
        }
    }
}

/// A discovered browser profile directory
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub name: String,
    pub path: PathBuf,
}

impl BrowserProfile {
    /// Path to the profile's extensions directory
    pub fn extensions_dir(&self, browser: Browser) -> PathBuf {
        self.path.join(browser.extensions_dir_name())
    }
}

/// Enumerate the available profiles for a browser.
///
/// Returns profiles sorted by name for a stable listing order.
pub fn discover_profiles(browser: Browser) -> ExtResult<Vec<BrowserProfile>> {
    let base = browser.profiles_base_dir()?;
    discover_profiles_in(browser, &base)
}

/// Enumerate profiles under an explicit user-data directory
pub fn discover_profiles_in(browser: Browser, base: &std::path::Path) -> ExtResult<Vec<BrowserProfile>> {
    if !base.exists() {
        return Err(ExtError::Profile(format!(
            "User data path '{}' does not exist",
            base.display()
        )));
    }

    let mut profiles = Vec::new();
    for entry in fs::read_dir(base)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let keep = match browser {
            // Chrome keeps profiles beside unrelated metadata directories
            Browser::Chrome => name == "Default" || name.starts_with("Profile "),
            // Firefox profile directories carry arbitrary salted names
            Browser::Firefox => !name.starts_with('.'),
        };
        if keep {
            profiles.push(BrowserProfile {
                name,
                path: entry.path(),
            });
        }
    }

    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(profiles)
}
