use crate::core::Manifest;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// An extension's display name after locale resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub display_name: String,
    pub extension_id: String,
}

const MSG_PREFIX: &str = "__MSG_";
const MSG_SUFFIX: &str = "__";

/// Resolve an extension's display name from its manifest.
///
/// A plain string name is returned verbatim. A `__MSG_<key>__`
/// placeholder is looked up in the extension's `_locales` message
/// tables, trying the manifest's `default_locale`, then `en`, then
/// `en_US`, then the first locale directory found (directory listing
/// order is filesystem-dependent, so that last step is best-effort).
/// Resolution never fails: if every candidate misses, a deterministic
/// `Unknown Extension (<id>)` fallback is produced.
pub fn resolve_name(manifest: &Manifest, extension_id: &str, extension_dir: &Path) -> ResolvedName {
    let display_name = match manifest.raw_name() {
        Some(raw) => match message_key(raw) {
            Some(key) => resolve_placeholder(key, extension_id, extension_dir, manifest),
            None => raw.to_string(),
        },
        // Non-string name (e.g. a locale-map object): degrade, never fail
        None => fallback_name(extension_id),
    };

    ResolvedName {
        display_name,
        extension_id: extension_id.to_string(),
    }
}

/// Extract `<key>` from a `__MSG_<key>__` placeholder name
fn message_key(raw: &str) -> Option<&str> {
    let key = raw.strip_prefix(MSG_PREFIX)?.strip_suffix(MSG_SUFFIX)?;
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

fn fallback_name(extension_id: &str) -> String {
    format!("Unknown Extension ({})", extension_id)
}

fn resolve_placeholder(
    key: &str,
    extension_id: &str,
    extension_dir: &Path,
    manifest: &Manifest,
) -> String {
    let locales_dir = extension_dir.join("_locales");

    let mut candidates: Vec<String> = Vec::new();
    if let Some(default_locale) = manifest.default_locale() {
        candidates.push(default_locale.to_string());
    }
    candidates.push("en".to_string());
    candidates.push("en_US".to_string());
    if let Some(first) = first_locale_dir(&locales_dir) {
        candidates.push(first);
    }

    let mut seen = std::collections::HashSet::new();
    for locale in candidates {
        if !seen.insert(locale.clone()) {
            continue;
        }
        if let Some(message) = lookup_message(&locales_dir.join(&locale), key) {
            return message;
        }
    }

    fallback_name(extension_id)
}

fn first_locale_dir(locales_dir: &Path) -> Option<String> {
    let entries = fs::read_dir(locales_dir).ok()?;
    entries
        .filter_map(|e| {
            let entry = e.ok()?;
            if entry.path().is_dir() {
                Some(entry.file_name().to_string_lossy().to_string())
            } else {
                None
            }
        })
        .next()
}

/// Load one locale's message table and look up a key.
///
/// Malformed or unreadable message files are logged and treated as a
/// miss, not a fatal error.
fn lookup_message(locale_dir: &Path, key: &str) -> Option<String> {
    let messages_path: PathBuf = locale_dir.join("messages.json");
    if !messages_path.exists() {
        return None;
    }

    let content = match fs::read_to_string(&messages_path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Error reading locale file {}: {}", messages_path.display(), e);
            return None;
        }
    };

    let messages: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            warn!("Error parsing locale file {}: {}", messages_path.display(), e);
            return None;
        }
    };

    // Message keys are case-insensitive in Chromium; try exact first
    let table = messages.as_object()?;
    let entry = table
        .get(key)
        .or_else(|| {
            table
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })?;
    entry.get("message")?.as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn manifest(value: serde_json::Value) -> Manifest {
        Manifest::from_value(value).unwrap()
    }

    fn write_locale(dir: &Path, locale: &str, body: &str) {
        let locale_dir = dir.join("_locales").join(locale);
        fs::create_dir_all(&locale_dir).unwrap();
        fs::write(locale_dir.join("messages.json"), body).unwrap();
    }

    #[test]
    fn test_plain_name_returned_verbatim() {
        let temp = TempDir::new().unwrap();
        let m = manifest(json!({"name": "Plain Name"}));
        let resolved = resolve_name(&m, "id123", temp.path());
        assert_eq!(resolved.display_name, "Plain Name");
        assert_eq!(resolved.extension_id, "id123");
    }

    #[test]
    fn test_placeholder_resolved_from_en_locale() {
        let temp = TempDir::new().unwrap();
        write_locale(temp.path(), "en", r#"{"appName": {"message": "Bar"}}"#);

        let m = manifest(json!({"name": "__MSG_appName__"}));
        let resolved = resolve_name(&m, "id123", temp.path());
        assert_eq!(resolved.display_name, "Bar");
    }

    #[test]
    fn test_default_locale_preferred() {
        let temp = TempDir::new().unwrap();
        write_locale(temp.path(), "en", r#"{"appName": {"message": "English"}}"#);
        write_locale(temp.path(), "de", r#"{"appName": {"message": "Deutsch"}}"#);

        let m = manifest(json!({"name": "__MSG_appName__", "default_locale": "de"}));
        let resolved = resolve_name(&m, "id123", temp.path());
        assert_eq!(resolved.display_name, "Deutsch");
    }

    #[test]
    fn test_first_available_locale_as_last_resort() {
        let temp = TempDir::new().unwrap();
        write_locale(temp.path(), "fr", r#"{"appName": {"message": "Français"}}"#);

        let m = manifest(json!({"name": "__MSG_appName__"}));
        let resolved = resolve_name(&m, "id123", temp.path());
        assert_eq!(resolved.display_name, "Français");
    }

    #[test]
    fn test_malformed_locale_is_a_miss_not_an_error() {
        let temp = TempDir::new().unwrap();
        write_locale(temp.path(), "en", "{broken json");
        write_locale(temp.path(), "en_US", r#"{"appName": {"message": "Recovered"}}"#);

        let m = manifest(json!({"name": "__MSG_appName__"}));
        let resolved = resolve_name(&m, "id123", temp.path());
        assert_eq!(resolved.display_name, "Recovered");
    }

    #[test]
    fn test_exhausted_candidates_yield_fallback() {
        let temp = TempDir::new().unwrap();
        let m = manifest(json!({"name": "__MSG_missing__"}));
        let resolved = resolve_name(&m, "abc123", temp.path());
        assert_eq!(resolved.display_name, "Unknown Extension (abc123)");
    }

    #[test]
    fn test_non_string_name_degrades_to_fallback() {
        let temp = TempDir::new().unwrap();
        let m = manifest(json!({"name": {"en": "Mapped"}}));
        let resolved = resolve_name(&m, "xyz", temp.path());
        assert_eq!(resolved.display_name, "Unknown Extension (xyz)");
    }

    #[test]
    fn test_case_insensitive_message_key() {
        let temp = TempDir::new().unwrap();
        write_locale(temp.path(), "en", r#"{"APPNAME": {"message": "Upper"}}"#);

        let m = manifest(json!({"name": "__MSG_appName__"}));
        let resolved = resolve_name(&m, "id123", temp.path());
        assert_eq!(resolved.display_name, "Upper");
    }
}
