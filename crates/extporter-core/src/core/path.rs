use crate::core::error::{ExtError, ExtResult};
use std::path::{Path, PathBuf};

/// Get the extporter home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\extporter
/// - Linux: ~/.config/extporter
/// - macOS: ~/Library/Application Support/extporter
pub fn extporter_home() -> ExtResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ExtError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("extporter"))
}

/// Get the config file path
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\extporter\config.yaml
/// - Linux: ~/.config/extporter/config.yaml
/// - macOS: ~/Library/Application Support/extporter/config.yaml
pub fn config_file() -> ExtResult<PathBuf> {
    Ok(extporter_home()?.join("config.yaml"))
}

/// Get the default output root for converted packages (./converted)
///
/// Artifacts are written under `<output root>/<target>/`, one
/// subdirectory per target format.
pub fn default_output_root() -> ExtResult<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| ExtError::Path(format!("Failed to get current directory: {}", e)))?;
    Ok(cwd.join("converted"))
}

/// Get the user's home directory
pub fn home_dir() -> ExtResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| ExtError::Path("Could not determine home directory".to_string()))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> ExtResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("test_dir");

        ensure_dir(&dir).unwrap();
        assert!(dir.exists());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_config_file_under_home() {
        let config = config_file().unwrap();
        assert!(config.ends_with("extporter/config.yaml") || config.ends_with("extporter\\config.yaml"));
    }
}
