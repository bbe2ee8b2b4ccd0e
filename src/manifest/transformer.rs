use crate::convert::target::TargetFormat;
use crate::core::Manifest;
use serde_json::{json, Value};

/// A manifest rewritten for a specific target format.
///
/// Always a fresh copy; the source manifest is never mutated.
pub type TransformedManifest = Manifest;

/// Top-level keys Firefox does not accept
const FIREFOX_UNSUPPORTED_KEYS: &[&str] = &[
    "key",
    "oauth2",
    "storage",
    "system_indicator",
    "update_url",
    "nacl_modules",
    "platforms",
    "requirements",
    "tts_engine",
];

/// Keys only meaningful to Firefox, stripped for Chromium targets
const CHROMIUM_UNSUPPORTED_KEYS: &[&str] = &["applications", "browser_specific_settings"];

/// Rewrite a manifest for the given target format.
///
/// Pure with respect to its input, and idempotent: transforming an
/// already-transformed manifest again for the same target yields no
/// further changes.
pub fn transform(manifest: &Manifest, display_name: &str, target: TargetFormat) -> TransformedManifest {
    let mut out = manifest.clone();

    match target {
        TargetFormat::Firefox => transform_for_firefox(&mut out, display_name),
        TargetFormat::Chrome | TargetFormat::Edge => transform_for_chromium(&mut out),
    }

    out
}

fn transform_for_firefox(manifest: &mut Manifest, display_name: &str) {
    for key in FIREFOX_UNSUPPORTED_KEYS {
        manifest.remove(key);
    }

    // externally_connectable survives, but only in reduced form
    if let Some(Value::Object(mut ec)) = manifest.get("externally_connectable").cloned() {
        ec.remove("matches");
        ec.remove("accepts_tls_channel_id");
        manifest.insert("externally_connectable", Value::Object(ec));
    }

    // Firefox installs unsigned mv2 packages; mv3 is clamped down
    if let (Some(version), Some(max)) = (
        manifest.manifest_version(),
        TargetFormat::Firefox.max_manifest_version(),
    ) {
        if version > max {
            manifest.insert("manifest_version", json!(max));
        }
    }

    // Firefox only accepts the string form of a CSP
    if let Some(Value::Object(csp)) = manifest.get("content_security_policy").cloned() {
        match csp.get("extension_pages").and_then(Value::as_str) {
            Some(pages) => manifest.insert("content_security_policy", json!(pages)),
            None => {
                manifest.remove("content_security_policy");
            }
        }
    }

    let gecko_id = format!("{}@firefox", slug(display_name));
    manifest.insert(
        "browser_specific_settings",
        json!({ "gecko": { "id": gecko_id } }),
    );
}

fn transform_for_chromium(manifest: &mut Manifest) {
    for key in CHROMIUM_UNSUPPORTED_KEYS {
        manifest.remove(key);
    }
    // manifest_version is left as-is: upgrading is not mechanically safe
}

/// Sanitize a display name for use in file and folder names.
///
/// Keeps alphanumerics and `._- ` (space), replaces everything else
/// with `_`, and trims surrounding whitespace.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || "._- ".contains(c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim().to_string()
}

/// Lowercase, underscore-joined slug of a display name.
///
/// Idempotent, but not globally unique: two extensions with the same
/// sanitized name produce the same slug. Callers that share an output
/// namespace must disambiguate.
pub fn slug(name: &str) -> String {
    sanitize_name(name).to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(value: serde_json::Value) -> Manifest {
        Manifest::from_value(value).unwrap()
    }

    #[test]
    fn test_firefox_strips_unsupported_keys() {
        let m = manifest(json!({
            "name": "Test Ext",
            "key": "abc",
            "oauth2": {"client_id": "x"},
            "update_url": "https://example.com",
            "background": {"scripts": ["bg.js"]}
        }));
        let out = transform(&m, "Test Ext", TargetFormat::Firefox);
        assert!(!out.contains_key("key"));
        assert!(!out.contains_key("oauth2"));
        assert!(!out.contains_key("update_url"));
        assert!(out.contains_key("background"));
        // Source untouched
        assert!(m.contains_key("key"));
    }

    #[test]
    fn test_firefox_clamps_manifest_version() {
        let m = manifest(json!({"name": "Test Ext", "manifest_version": 3}));
        let out = transform(&m, "Test Ext", TargetFormat::Firefox);
        assert_eq!(out.manifest_version(), Some(2));

        let m2 = manifest(json!({"name": "Test Ext", "manifest_version": 2}));
        let out2 = transform(&m2, "Test Ext", TargetFormat::Firefox);
        assert_eq!(out2.manifest_version(), Some(2));
    }

    #[test]
    fn test_firefox_injects_gecko_id() {
        let m = manifest(json!({"name": "Test Ext"}));
        let out = transform(&m, "Test Ext", TargetFormat::Firefox);
        let id = out
            .get("browser_specific_settings")
            .and_then(|v| v.get("gecko"))
            .and_then(|v| v.get("id"))
            .and_then(Value::as_str);
        assert_eq!(id, Some("test_ext@firefox"));
    }

    #[test]
    fn test_firefox_flattens_structured_csp() {
        let m = manifest(json!({
            "name": "Test Ext",
            "content_security_policy": {"extension_pages": "script-src 'self'"}
        }));
        let out = transform(&m, "Test Ext", TargetFormat::Firefox);
        assert_eq!(
            out.get("content_security_policy").and_then(Value::as_str),
            Some("script-src 'self'")
        );
    }

    #[test]
    fn test_firefox_reduces_externally_connectable() {
        let m = manifest(json!({
            "name": "Test Ext",
            "externally_connectable": {
                "matches": ["https://example.com/*"],
                "accepts_tls_channel_id": true,
                "ids": ["abc"]
            }
        }));
        let out = transform(&m, "Test Ext", TargetFormat::Firefox);
        let ec = out.get("externally_connectable").unwrap();
        assert!(ec.get("matches").is_none());
        assert!(ec.get("accepts_tls_channel_id").is_none());
        assert!(ec.get("ids").is_some());
    }

    #[test]
    fn test_chromium_strips_firefox_keys() {
        let m = manifest(json!({
            "name": "Test Ext",
            "manifest_version": 2,
            "browser_specific_settings": {"gecko": {"id": "x@firefox"}},
            "applications": {"gecko": {"id": "x@firefox"}}
        }));
        let out = transform(&m, "Test Ext", TargetFormat::Chrome);
        assert!(!out.contains_key("browser_specific_settings"));
        assert!(!out.contains_key("applications"));
        // No forced manifest_version change
        assert_eq!(out.manifest_version(), Some(2));
    }

    #[test]
    fn test_transform_is_idempotent_per_target() {
        let m = manifest(json!({
            "name": "Test Ext",
            "manifest_version": 3,
            "key": "abc",
            "content_security_policy": {"extension_pages": "script-src 'self'"}
        }));
        let once = transform(&m, "Test Ext", TargetFormat::Firefox);
        let twice = transform(&once, "Test Ext", TargetFormat::Firefox);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Test Ext"), "Test Ext");
        assert_eq!(sanitize_name("Ad*Block?!"), "Ad_Block__");
        assert_eq!(sanitize_name("  padded  "), "padded");
        assert_eq!(sanitize_name("dots.and-dashes_ok"), "dots.and-dashes_ok");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Test Ext"), "test_ext");
        assert_eq!(slug(slug("Test Ext").as_str()), "test_ext");
    }
}
