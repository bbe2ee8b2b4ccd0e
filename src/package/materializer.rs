use crate::core::ExtResult;
use extporter_core::manifest::MANIFEST_FILE;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Files above this size are assumed to be compiled payloads and skipped
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Relative paths longer than this risk platform path-length failures
pub const MAX_RELATIVE_PATH_LEN: usize = 250;

/// Native code cannot cross the packaging boundary
const NATIVE_BINARY_EXTENSIONS: &[&str] = &["dll", "so", "dylib", "exe", "node"];

/// Chrome drops per-platform runtime payloads under this directory
const PLATFORM_BUNDLE_DIR: &str = "_platform_specific";

/// Why a file-tree entry was left out of the materialized copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooLarge,
    PathTooLong,
    NativeBinary,
    PlatformResourceBundle,
    AccessDenied,
    Other(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge => write!(f, "file exceeds {} MiB", MAX_FILE_SIZE / (1024 * 1024)),
            SkipReason::PathTooLong => {
                write!(f, "relative path exceeds {} characters", MAX_RELATIVE_PATH_LEN)
            }
            SkipReason::NativeBinary => write!(f, "native binary"),
            SkipReason::PlatformResourceBundle => write!(f, "platform resource bundle"),
            SkipReason::AccessDenied => write!(f, "access denied"),
            SkipReason::Other(detail) => write!(f, "{}", detail),
        }
    }
}

/// Per-entry result of the materialization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Skipped(SkipReason),
}

/// Record of which entries were omitted during materialization and why
#[derive(Debug, Default)]
pub struct SkipReport {
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub total_files: usize,
}

impl SkipReport {
    fn record(&mut self, rel_path: &Path, outcome: CopyOutcome) {
        self.total_files += 1;
        if let CopyOutcome::Skipped(reason) = outcome {
            warn!("Skipping '{}': {}", rel_path.display(), reason);
            self.skipped.push((rel_path.to_path_buf(), reason));
        }
    }

    pub fn copied(&self) -> usize {
        self.total_files - self.skipped.len()
    }

    /// More than half of the observed files were skipped: the output is
    /// likely non-functional even though structurally valid.
    pub fn mostly_skipped(&self) -> bool {
        self.total_files > 0 && self.skipped.len() * 2 > self.total_files
    }

    /// The first few offending entries, for user-facing summaries
    pub fn top_offenders(&self, limit: usize) -> impl Iterator<Item = &(PathBuf, SkipReason)> {
        self.skipped.iter().take(limit)
    }
}

/// Copy an extension's file tree into a working directory with
/// per-entry fault isolation.
///
/// A failure copying one file is recorded in the report and processing
/// continues; the operation as a whole only errors if the destination
/// root itself cannot be created. The root `manifest.json` is excluded:
/// the builder writes the transformed manifest separately.
pub fn copy_tree(source: &Path, dest: &Path) -> ExtResult<SkipReport> {
    fs::create_dir_all(dest)?;

    let mut report = SkipReport::default();

    let walker = WalkDir::new(source)
        .into_iter()
        .filter_entry(|e| !is_pruned_dir(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                let rel = err
                    .path()
                    .and_then(|p| p.strip_prefix(source).ok())
                    .unwrap_or_else(|| Path::new("<unknown>"));
                report.record(rel, CopyOutcome::Skipped(walk_error_reason(&err)));
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let rel = match entry.path().strip_prefix(source) {
            Ok(r) => r.to_path_buf(),
            Err(_) => continue,
        };

        // Written separately by the builder, after transformation
        if rel == Path::new(MANIFEST_FILE) {
            continue;
        }

        let outcome = copy_entry(&entry, &rel, dest);
        report.record(&rel, outcome);
    }

    Ok(report)
}

/// Directories excluded wholesale before traversal
fn is_pruned_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || name == "__MACOSX"
        || name == "_metadata"
        || name.ends_with(".crx.directory")
}

fn walk_error_reason(err: &walkdir::Error) -> SkipReason {
    match err.io_error() {
        Some(io) if io.kind() == std::io::ErrorKind::PermissionDenied => SkipReason::AccessDenied,
        _ => SkipReason::Other(err.to_string()),
    }
}

/// Classify one file against the content policy, then copy it
fn copy_entry(entry: &DirEntry, rel: &Path, dest: &Path) -> CopyOutcome {
    if let Some(reason) = policy_skip_reason(entry, rel) {
        return CopyOutcome::Skipped(reason);
    }

    let dest_path = dest.join(rel);
    if let Some(parent) = dest_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            return CopyOutcome::Skipped(io_skip_reason(&e));
        }
    }

    match fs::copy(entry.path(), &dest_path) {
        Ok(_) => CopyOutcome::Copied,
        Err(e) => CopyOutcome::Skipped(io_skip_reason(&e)),
    }
}

/// Content-policy pre-filter, independent of I/O success
fn policy_skip_reason(entry: &DirEntry, rel: &Path) -> Option<SkipReason> {
    if rel.to_string_lossy().len() > MAX_RELATIVE_PATH_LEN {
        return Some(SkipReason::PathTooLong);
    }

    if rel
        .components()
        .any(|c| c.as_os_str() == PLATFORM_BUNDLE_DIR)
    {
        return Some(SkipReason::PlatformResourceBundle);
    }

    if let Some(ext) = rel.extension().and_then(|e| e.to_str()) {
        let ext = ext.to_lowercase();
        if NATIVE_BINARY_EXTENSIONS.contains(&ext.as_str()) {
            return Some(SkipReason::NativeBinary);
        }
    }

    match entry.metadata() {
        Ok(meta) if meta.len() > MAX_FILE_SIZE => Some(SkipReason::TooLarge),
        Ok(_) => None,
        Err(e) => Some(walk_error_reason(&e)),
    }
}

fn io_skip_reason(e: &std::io::Error) -> SkipReason {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        SkipReason::AccessDenied
    } else {
        SkipReason::Other(e.to_string())
    }
}
