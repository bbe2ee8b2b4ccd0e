use crate::core::{ExtError, ExtResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// File name of the extension manifest inside a package
pub const MANIFEST_FILE: &str = "manifest.json";

/// An extension manifest: the unordered key/value metadata document
/// loaded from a package's `manifest.json`.
///
/// Invariant: a `Manifest` always contains a `name` key (string or
/// `__MSG_<key>__` locale placeholder); absence is a hard error at
/// construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    data: Map<String, Value>,
}

impl Manifest {
    /// Load manifest.json from a directory
    pub fn load(dir: &Path) -> ExtResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(ExtError::Manifest(format!(
                "manifest.json not found in {}",
                dir.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
    }

    /// Parse a manifest from its JSON text
    pub fn parse(content: &str) -> ExtResult<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| ExtError::Manifest(format!("Failed to parse manifest.json: {}", e)))?;
        Self::from_value(value)
    }

    /// Build a manifest from an already-parsed JSON value
    pub fn from_value(value: Value) -> ExtResult<Self> {
        let data = match value {
            Value::Object(map) => map,
            other => {
                return Err(ExtError::Manifest(format!(
                    "manifest.json must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        if !data.contains_key("name") {
            return Err(ExtError::Manifest(
                "manifest missing required 'name' field".to_string(),
            ));
        }

        Ok(Self { data })
    }

    /// The raw `name` value, if it is a plain string.
    ///
    /// May still be a `__MSG_<key>__` locale placeholder; use the name
    /// resolver to obtain a display name.
    pub fn raw_name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.data.get("version").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.data.get("description").and_then(Value::as_str)
    }

    pub fn default_locale(&self) -> Option<&str> {
        self.data.get("default_locale").and_then(Value::as_str)
    }

    pub fn manifest_version(&self) -> Option<u64> {
        self.data.get("manifest_version").and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_pretty_json(&self) -> ExtResult<String> {
        let mut json = serde_json::to_string_pretty(&self.data)?;
        json.push('\n');
        Ok(json)
    }

    /// Write manifest.json to the given file path
    pub fn save(&self, path: &Path) -> ExtResult<()> {
        fs::write(path, self.to_pretty_json()?)?;
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_manifest() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("manifest.json"),
            r#"{"name": "Test Ext", "version": "1.2.3", "manifest_version": 3}"#,
        )
        .unwrap();

        let manifest = Manifest::load(temp.path()).unwrap();
        assert_eq!(manifest.raw_name(), Some("Test Ext"));
        assert_eq!(manifest.version(), Some("1.2.3"));
        assert_eq!(manifest.manifest_version(), Some(3));
    }

    #[test]
    fn test_load_missing_manifest() {
        let temp = TempDir::new().unwrap();
        let result = Manifest::load(temp.path());
        assert!(matches!(result, Err(ExtError::Manifest(_))));
    }

    #[test]
    fn test_missing_name_is_hard_error() {
        let result = Manifest::from_value(json!({"version": "1.0"}));
        match result {
            Err(ExtError::Manifest(msg)) => assert!(msg.contains("name")),
            _ => panic!("Expected Manifest error"),
        }
    }

    #[test]
    fn test_non_object_manifest_rejected() {
        assert!(Manifest::from_value(json!(["not", "an", "object"])).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let temp = TempDir::new().unwrap();
        let manifest = Manifest::from_value(json!({"name": "Round Trip"})).unwrap();
        let path = temp.path().join("manifest.json");
        manifest.save(&path).unwrap();

        let loaded = Manifest::load(temp.path()).unwrap();
        assert_eq!(loaded.raw_name(), Some("Round Trip"));
    }
}
