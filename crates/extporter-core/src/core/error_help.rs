use crate::core::ExtError;

/// Provides helpful suggestions for common errors
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for ExtError {
    fn help(&self) -> Option<String> {
        match self {
            ExtError::Manifest(msg) => {
                if msg.contains("manifest.json not found") {
                    Some(
                        "💡 Suggestion: The extension directory may be incomplete. Re-sync the extension in its source browser and try again"
                            .to_string(),
                    )
                } else if msg.contains("missing required 'name'") {
                    Some(
                        "💡 Suggestion: The manifest has no 'name' field and cannot be repackaged. The install may be corrupt"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ExtError::Profile(msg) => {
                if msg.contains("No profiles found") || msg.contains("does not exist") {
                    Some(
                        "💡 Suggestion: Check that the browser is installed and has been launched at least once"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ExtError::Path(msg) => {
                if msg.contains("Could not determine") {
                    Some(
                        "💡 Suggestion: Check your system environment variables (HOME, APPDATA, etc.)"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ExtError::Yaml(e) => Some(format!(
                "💡 Suggestion: Check your config file syntax. Common issues:\n  - Missing colons after keys\n  - Incorrect indentation\n  - Unclosed quotes\n\nError details: {}",
                e
            )),
            ExtError::Http(e) => {
                if e.is_timeout() {
                    Some(
                        "💡 Suggestion: Check your internet connection, or try again later"
                            .to_string(),
                    )
                } else if e.is_connect() {
                    Some(
                        "💡 Suggestion: Check your internet connection and firewall settings"
                            .to_string(),
                    )
                } else {
                    Some(
                        "💡 Suggestion: Check your internet connection, or verify the add-on store is accessible"
                            .to_string(),
                    )
                }
            }
            ExtError::Io(e) => {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    Some(
                        "💡 Suggestion: Check file permissions, or try running with appropriate permissions"
                            .to_string(),
                    )
                } else if e.kind() == std::io::ErrorKind::NotFound {
                    Some(
                        "💡 Suggestion: The file or directory may not exist. Check the path and try again"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ExtError::Zip(_) => Some(
                "💡 Suggestion: The archive may be corrupt. Delete the output file and rebuild"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Format an error with helpful suggestions
pub fn format_error_with_help(error: &ExtError) -> String {
    let mut output = format!("❌ Error: {}", error);

    if let Some(help) = error.help() {
        output.push_str("\n\n");
        output.push_str(&help);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_help_manifest_not_found() {
        let error = ExtError::Manifest("manifest.json not found in /path".to_string());
        assert!(error.help().is_some());
        assert!(error.help().unwrap().contains("source browser"));
    }

    #[test]
    fn test_error_help_missing_name() {
        let error = ExtError::Manifest("manifest missing required 'name' field".to_string());
        assert!(error.help().unwrap().contains("repackaged"));
    }

    #[test]
    fn test_format_error_without_help() {
        let error = ExtError::Package("something else".to_string());
        let formatted = format_error_with_help(&error);
        assert!(formatted.contains("something else"));
        assert!(!formatted.contains("Suggestion"));
    }
}
