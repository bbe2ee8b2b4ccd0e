use crate::core::{ExtResult, Manifest};
use crate::manifest::resolver::resolve_name;
use crate::profile::discovery::{Browser, BrowserProfile};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

/// An installed extension found in a browser profile.
///
/// Identity is `(browser, id)`. `source_dir` is the directory that
/// holds the extension's `manifest.json` and files: for Chrome that is
/// the highest-sorting version folder under the extension's install
/// directory, for Firefox the extension folder itself.
#[derive(Debug, Clone)]
pub struct ExtensionDescriptor {
    pub id: String,
    pub browser: Browser,
    pub version: String,
    pub source_dir: PathBuf,
    pub display_name: String,
}

/// Chrome extension ids are 32 characters drawn from a-p
fn chrome_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("^[a-p]{32}$").expect("valid extension id pattern"))
}

/// Enumerate the extensions installed in a profile.
///
/// Extensions whose manifest is missing or unparseable are logged and
/// skipped; enumeration itself never fails because of one bad entry.
pub fn list_extensions(profile: &BrowserProfile, browser: Browser) -> ExtResult<Vec<ExtensionDescriptor>> {
    let ext_path = profile.extensions_dir(browser);
    if !ext_path.exists() {
        warn!(
            "Extensions path '{}' does not exist in profile '{}'",
            ext_path.display(),
            profile.name
        );
        return Ok(Vec::new());
    }

    let mut extensions = Vec::new();
    for entry in fs::read_dir(&ext_path)? {
        let entry = entry?;
        let ext_dir = entry.path();
        if !ext_dir.is_dir() {
            continue;
        }
        let id = entry.file_name().to_string_lossy().to_string();

        let descriptor = match browser {
            Browser::Chrome => {
                if !chrome_id_pattern().is_match(&id) {
                    continue;
                }
                describe_chrome_extension(&id, &ext_dir)
            }
            Browser::Firefox => describe_firefox_extension(&id, &ext_dir),
        };

        match descriptor {
            Some(d) => extensions.push(d),
            None => warn!("Skipping extension '{}': no readable manifest", id),
        }
    }

    extensions.sort_by(|a, b| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()));
    Ok(extensions)
}

/// Pick the version folder Chrome considers current.
///
/// Chrome installs as Extensions/<id>/<version>/manifest.json. The
/// highest version is chosen by raw lexicographic comparison on the
/// folder name, not semantic-version order ("9" sorts above "10").
pub fn latest_version_dir(ext_dir: &Path) -> Option<(String, PathBuf)> {
    let entries = fs::read_dir(ext_dir).ok()?;
    let mut versions: Vec<String> = entries
        .filter_map(|e| {
            let entry = e.ok()?;
            if entry.path().is_dir() {
                Some(entry.file_name().to_string_lossy().to_string())
            } else {
                None
            }
        })
        .collect();
    versions.sort();
    let latest = versions.pop()?;
    let dir = ext_dir.join(&latest);
    Some((latest, dir))
}

fn describe_chrome_extension(id: &str, ext_dir: &Path) -> Option<ExtensionDescriptor> {
    let (version, version_dir) = latest_version_dir(ext_dir)?;
    let manifest = load_manifest_logged(id, &version_dir)?;
    let resolved = resolve_name(&manifest, id, &version_dir);

    Some(ExtensionDescriptor {
        id: id.to_string(),
        browser: Browser::Chrome,
        version: manifest.version().unwrap_or(&version).to_string(),
        source_dir: version_dir,
        display_name: resolved.display_name,
    })
}

fn describe_firefox_extension(id: &str, ext_dir: &Path) -> Option<ExtensionDescriptor> {
    let manifest = load_manifest_logged(id, ext_dir)?;
    let resolved = resolve_name(&manifest, id, ext_dir);

    Some(ExtensionDescriptor {
        id: id.to_string(),
        browser: Browser::Firefox,
        version: manifest.version().unwrap_or("0").to_string(),
        source_dir: ext_dir.to_path_buf(),
        display_name: resolved.display_name,
    })
}

fn load_manifest_logged(id: &str, dir: &Path) -> Option<Manifest> {
    match Manifest::load(dir) {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("Failed to read manifest for '{}': {}", id, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXT_ID: &str = "abcdefghijklmnopabcdefghijklmnop";

    fn write_chrome_extension(base: &Path, id: &str, version: &str, name: &str) {
        let dir = base.join("Extensions").join(id).join(version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("manifest.json"),
            format!(r#"{{"name": "{}", "version": "{}"}}"#, name, version),
        )
        .unwrap();
    }

    #[test]
    fn test_list_chrome_extensions() {
        let temp = TempDir::new().unwrap();
        write_chrome_extension(temp.path(), EXT_ID, "1.0.0", "Sample Ext");

        let profile = BrowserProfile {
            name: "Default".to_string(),
            path: temp.path().to_path_buf(),
        };
        let extensions = list_extensions(&profile, Browser::Chrome).unwrap();
        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions[0].id, EXT_ID);
        assert_eq!(extensions[0].display_name, "Sample Ext");
        assert!(extensions[0].source_dir.ends_with("1.0.0"));
    }

    #[test]
    fn test_latest_version_dir_is_lexicographic() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("1.9.0")).unwrap();
        fs::create_dir_all(temp.path().join("1.10.0")).unwrap();

        // Raw string comparison: "1.9.0" sorts above "1.10.0"
        let (version, _) = latest_version_dir(temp.path()).unwrap();
        assert_eq!(version, "1.9.0");
    }

    #[test]
    fn test_unreadable_manifest_is_skipped() {
        let temp = TempDir::new().unwrap();
        let dir = temp
            .path()
            .join("Extensions")
            .join(EXT_ID)
            .join("2.0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("manifest.json"), "{not json").unwrap();

        let profile = BrowserProfile {
            name: "Default".to_string(),
            path: temp.path().to_path_buf(),
        };
        let extensions = list_extensions(&profile, Browser::Chrome).unwrap();
        assert!(extensions.is_empty());
    }

    #[test]
    fn test_non_extension_dirs_ignored() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Extensions").join("Temp")).unwrap();

        let profile = BrowserProfile {
            name: "Default".to_string(),
            path: temp.path().to_path_buf(),
        };
        let extensions = list_extensions(&profile, Browser::Chrome).unwrap();
        assert!(extensions.is_empty());
    }

    #[test]
    fn test_missing_extensions_dir_yields_empty() {
        let temp = TempDir::new().unwrap();
        let profile = BrowserProfile {
            name: "Default".to_string(),
            path: temp.path().to_path_buf(),
        };
        let extensions = list_extensions(&profile, Browser::Chrome).unwrap();
        assert!(extensions.is_empty());
    }
}
