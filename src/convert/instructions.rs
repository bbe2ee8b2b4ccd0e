use crate::convert::target::TargetFormat;
use crate::core::ExtResult;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a README.txt with install options into the output directory.
///
/// Only archive targets get one; unpacked Chromium output is loaded the
/// same way it was exported. Returns the path if a file was written.
pub fn write_install_instructions(
    output_dir: &Path,
    target: TargetFormat,
) -> ExtResult<Option<PathBuf>> {
    if target != TargetFormat::Firefox {
        return Ok(None);
    }

    let mut text = String::new();
    let _ = writeln!(text, "Installing converted extensions in Firefox");
    let _ = writeln!(text, "==========================================");
    let _ = writeln!(text);
    let _ = writeln!(text, "Option 1: Temporary installation (recommended first)");
    let _ = writeln!(text, "  1. Open about:debugging#/runtime/this-firefox");
    let _ = writeln!(text, "  2. Click \"Load Temporary Add-on...\"");
    let _ = writeln!(
        text,
        "  3. Pick the manifest.json inside one of the unpacked folders here"
    );
    let _ = writeln!(text, "  Temporary add-ons are removed when Firefox restarts.");
    let _ = writeln!(text);
    let _ = writeln!(text, "Option 2: Permanent installation of an .xpi");
    let _ = writeln!(
        text,
        "  Regular Firefox only installs signed add-ons. Either submit the"
    );
    let _ = writeln!(
        text,
        "  .xpi to addons.mozilla.org for signing, or use Firefox Developer"
    );
    let _ = writeln!(
        text,
        "  Edition / Nightly with xpinstall.signatures.required set to false"
    );
    let _ = writeln!(
        text,
        "  in about:config, then open the .xpi file with File > Open."
    );
    let _ = writeln!(text);
    let _ = writeln!(text, "Option 3: Check the official store first");
    let _ = writeln!(
        text,
        "  Many popular extensions already have a native Firefox release on"
    );
    let _ = writeln!(
        text,
        "  https://addons.mozilla.org. Prefer those when they exist."
    );

    let path = output_dir.join("README.txt");
    fs::write(&path, text)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_firefox_target_gets_readme() {
        let dir = TempDir::new().unwrap();
        let path = write_install_instructions(dir.path(), TargetFormat::Firefox)
            .unwrap()
            .unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("about:debugging"));
        assert!(text.contains("addons.mozilla.org"));
    }

    #[test]
    fn test_chromium_targets_get_none() {
        let dir = TempDir::new().unwrap();
        assert!(write_install_instructions(dir.path(), TargetFormat::Chrome)
            .unwrap()
            .is_none());
        assert!(!dir.path().join("README.txt").exists());
    }
}
