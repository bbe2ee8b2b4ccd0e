use crate::convert::target::TargetFormat;
use crate::core::{ExtError, ExtResult, Manifest};
use chrono::{Datelike, Local, Timelike};
use extporter_core::manifest::MANIFEST_FILE;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Shape of a produced package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Directory,
    Archive,
}

/// A finished package on disk.
///
/// The artifact at `path` is either absent or complete: builds write
/// into a freshly-claimed path, never merge into stale contents.
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Assembles the final artifact from a resolved manifest and a
/// materialized file tree.
pub struct PackageBuilder {
    target: TargetFormat,
}

impl PackageBuilder {
    pub fn new(target: TargetFormat) -> Self {
        Self { target }
    }

    /// Build the package at `output_path`.
    ///
    /// Archive targets produce a deflate-compressed zip with
    /// `manifest.json` as the first entry; directory targets mirror the
    /// staging tree and write the manifest into it.
    pub fn build(
        &self,
        staging_dir: &Path,
        manifest: &Manifest,
        output_path: &Path,
    ) -> ExtResult<PackageArtifact> {
        if self.target.is_archive() {
            self.build_archive(staging_dir, manifest, output_path)
        } else {
            Self::build_directory(staging_dir, manifest, output_path)
        }
    }

    fn build_archive(
        &self,
        staging_dir: &Path,
        manifest: &Manifest,
        output_path: &Path,
    ) -> ExtResult<PackageArtifact> {
        let output_path = claim_output_path(output_path)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // One timestamp for every entry, captured at build start, so a
        // rebuild of the same content is reproducible within a run
        let timestamp = build_timestamp();
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(timestamp);

        let file = File::create(&output_path)?;
        let mut zip = ZipWriter::new(file);

        // Manifest first: some consuming browsers stream-parse archives
        zip.start_file(MANIFEST_FILE, options)?;
        zip.write_all(manifest.to_pretty_json()?.as_bytes())?;

        for entry in WalkDir::new(staging_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(staging_dir)
                .map_err(|e| ExtError::Path(format!("Failed to get relative path: {}", e)))?;
            if rel == Path::new(MANIFEST_FILE) {
                continue;
            }

            let entry_name = rel.to_string_lossy().replace('\\', "/");
            zip.start_file(entry_name, options)?;
            let mut reader = File::open(entry.path())?;
            io::copy(&mut reader, &mut zip)?;
        }

        zip.finish()?;

        let size_bytes = fs::metadata(&output_path)?.len();
        Ok(PackageArtifact {
            kind: ArtifactKind::Archive,
            path: output_path,
            size_bytes,
        })
    }

    /// Mirror the staging tree into `output_dir` and write the manifest.
    ///
    /// An existing same-named output directory is replaced wholesale to
    /// avoid stale-file merges.
    pub fn build_directory(
        staging_dir: &Path,
        manifest: &Manifest,
        output_dir: &Path,
    ) -> ExtResult<PackageArtifact> {
        if output_dir.exists() {
            fs::remove_dir_all(output_dir)?;
        }
        fs::create_dir_all(output_dir)?;

        let mut size_bytes = 0u64;
        for entry in WalkDir::new(staging_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(staging_dir)
                .map_err(|e| ExtError::Path(format!("Failed to get relative path: {}", e)))?;
            if rel == Path::new(MANIFEST_FILE) {
                continue;
            }

            let dest_path = output_dir.join(rel);
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            size_bytes += fs::copy(entry.path(), &dest_path)?;
        }

        let manifest_path = output_dir.join(MANIFEST_FILE);
        manifest.save(&manifest_path)?;
        size_bytes += fs::metadata(&manifest_path)?.len();

        Ok(PackageArtifact {
            kind: ArtifactKind::Directory,
            path: output_dir.to_path_buf(),
            size_bytes,
        })
    }
}

/// Remove a pre-existing artifact at `path`, falling back to a suffixed
/// alternate path if the file is locked by another process.
///
/// The alternate path is a recoverable condition, not an error; it is
/// surfaced to the caller through the returned path.
fn claim_output_path(path: &Path) -> ExtResult<PathBuf> {
    if !path.exists() {
        return Ok(path.to_path_buf());
    }

    match fs::remove_file(path) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(e) => {
            warn!(
                "Could not replace '{}' ({}), using an alternate output path",
                path.display(),
                e
            );
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "package".to_string());
            let ext = path
                .extension()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let parent = path.parent().unwrap_or_else(|| Path::new("."));

            for n in 1..=9 {
                let candidate = if ext.is_empty() {
                    parent.join(format!("{}-{}", stem, n))
                } else {
                    parent.join(format!("{}-{}.{}", stem, n, ext))
                };
                if !candidate.exists() || fs::remove_file(&candidate).is_ok() {
                    return Ok(candidate);
                }
            }

            Err(ExtError::Package(format!(
                "Could not claim an output path near '{}'",
                path.display()
            )))
        }
    }
}

/// Zip entry timestamp captured once per build
fn build_timestamp() -> zip::DateTime {
    let now = Local::now();
    zip::DateTime::from_date_and_time(
        now.year() as u16,
        now.month() as u8,
        now.day() as u8,
        now.hour() as u8,
        now.minute() as u8,
        now.second() as u8,
    )
    .unwrap_or_default()
}
