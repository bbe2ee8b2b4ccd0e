use crate::core::path::{config_file, default_output_root, ensure_dir};
use crate::core::ExtResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_search_base_url() -> String {
    "https://addons.mozilla.org".to_string()
}

fn default_true() -> bool {
    true
}

/// User configuration, persisted as YAML in the platform config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for converted packages; defaults to ./converted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_root: Option<String>,
    /// Base URL of the alternative-lookup API
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
    /// Emit placeholder packages for commercial extensions by default
    #[serde(default)]
    pub emit_placeholders: bool,
    /// Keep an unpacked directory beside archive artifacts
    #[serde(default = "default_true")]
    pub keep_unpacked: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_root: None,
            search_base_url: default_search_base_url(),
            emit_placeholders: false,
            keep_unpacked: true,
        }
    }
}

impl Config {
    /// Load the configuration, falling back to defaults when no file exists
    pub fn load() -> ExtResult<Self> {
        let path = config_file()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)?;
        let config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Persist the configuration to the platform config directory
    pub fn save(&self) -> ExtResult<()> {
        let path = config_file()?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let contents = serde_yaml::to_string(self)?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Resolve the effective output root
    pub fn resolved_output_root(&self) -> ExtResult<PathBuf> {
        match &self.output_root {
            Some(root) => Ok(PathBuf::from(root)),
            None => default_output_root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search_base_url, "https://addons.mozilla.org");
        assert!(!config.emit_placeholders);
        assert!(config.keep_unpacked);
        assert!(config.output_root.is_none());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("output_root: /tmp/out\n").unwrap();
        assert_eq!(config.output_root.as_deref(), Some("/tmp/out"));
        assert_eq!(config.search_base_url, "https://addons.mozilla.org");
        assert!(config.keep_unpacked);
    }

    #[test]
    fn test_roundtrip_yaml() {
        let mut config = Config::default();
        config.emit_placeholders = true;
        config.output_root = Some("/srv/extensions".to_string());

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(parsed.emit_placeholders);
        assert_eq!(parsed.output_root.as_deref(), Some("/srv/extensions"));
    }

    #[test]
    fn test_resolved_output_root_explicit() {
        let config = Config {
            output_root: Some("/data/converted".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.resolved_output_root().unwrap(),
            PathBuf::from("/data/converted")
        );
    }
}
