use crate::package::builder::{ArtifactKind, PackageArtifact};
use extporter_core::manifest::{Manifest, MANIFEST_FILE};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use zip::ZipArchive;

/// Below this size no plausible package exists (empty zip + manifest)
const MIN_PLAUSIBLE_ARCHIVE_BYTES: u64 = 100;

/// Outcome of post-build structural validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub ok: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    fn pass() -> Self {
        Self { ok: true, reason: None }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

/// Opens a produced artifact and checks structural well-formedness.
///
/// Validation never deletes anything: a corrupt artifact is reported
/// and the caller decides what to keep.
pub struct PackageValidator;

impl PackageValidator {
    pub fn validate(artifact: &PackageArtifact, display_name: &str) -> ValidationResult {
        match artifact.kind {
            ArtifactKind::Archive => Self::validate_archive(&artifact.path, display_name),
            ArtifactKind::Directory => Self::validate_directory(&artifact.path, display_name),
        }
    }

    pub fn validate_archive(path: &Path, display_name: &str) -> ValidationResult {
        if !path.exists() {
            return ValidationResult::fail(format!(
                "archive for '{}' was not created at {}",
                display_name,
                path.display()
            ));
        }

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => return ValidationResult::fail(format!("cannot stat archive: {}", e)),
        };
        if size < MIN_PLAUSIBLE_ARCHIVE_BYTES {
            return ValidationResult::fail(format!(
                "archive is implausibly small ({} bytes)",
                size
            ));
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => return ValidationResult::fail(format!("cannot open archive: {}", e)),
        };
        let mut archive = match ZipArchive::new(file) {
            Ok(a) => a,
            Err(e) => return ValidationResult::fail(format!("not a well-formed archive: {}", e)),
        };

        // Manifest entry must exist and parse
        let mut manifest_bytes = String::new();
        match archive.by_name(MANIFEST_FILE) {
            Ok(mut entry) => {
                if let Err(e) = entry.read_to_string(&mut manifest_bytes) {
                    return ValidationResult::fail(format!("cannot read manifest entry: {}", e));
                }
            }
            Err(_) => {
                return ValidationResult::fail("archive has no manifest.json entry".to_string())
            }
        }
        if let Err(e) = Manifest::parse(&manifest_bytes) {
            return ValidationResult::fail(format!("manifest entry is not well-formed: {}", e));
        }

        // Integrity scan: reading an entry to the end verifies its CRC
        for index in 0..archive.len() {
            let corrupt = match archive.by_index(index) {
                Ok(mut entry) => {
                    let name = entry.name().to_string();
                    match io::copy(&mut entry, &mut io::sink()) {
                        Ok(_) => None,
                        Err(e) => Some(format!("corrupt archive member '{}': {}", name, e)),
                    }
                }
                Err(e) => Some(format!("unreadable archive member #{}: {}", index, e)),
            };
            if let Some(reason) = corrupt {
                return ValidationResult::fail(reason);
            }
        }

        ValidationResult::pass()
    }

    pub fn validate_directory(path: &Path, display_name: &str) -> ValidationResult {
        if !path.is_dir() {
            return ValidationResult::fail(format!(
                "output directory for '{}' was not created at {}",
                display_name,
                path.display()
            ));
        }
        match Manifest::load(path) {
            Ok(_) => ValidationResult::pass(),
            Err(e) => ValidationResult::fail(format!("manifest is missing or malformed: {}", e)),
        }
    }
}
