pub mod instructions;
pub mod target;

pub use target::TargetFormat;

use crate::commercial::{Classification, CuratedLists, OfficialAlternative};
use crate::core::path::ensure_dir;
use crate::core::{ExtResult, Manifest};
use crate::manifest::resolver::{resolve_name, ResolvedName};
use crate::manifest::transformer::{sanitize_name, slug, transform, TransformedManifest};
use crate::package::builder::{ArtifactKind, PackageArtifact, PackageBuilder};
use crate::package::materializer::{copy_tree, SkipReport};
use crate::package::placeholder::PlaceholderBuilder;
use crate::package::validator::{PackageValidator, ValidationResult};
use crate::profile::ExtensionDescriptor;
use crate::store::{AlternativeCandidate, SearchApi};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long the pipeline waits on the background alternative lookup
/// before reporting, so slow lookups never stall package creation
const LOOKUP_JOIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Operator policy knobs, resolved before the batch starts.
///
/// The orchestrator never prompts; interactive decisions belong to the
/// CLI layer.
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Emit placeholder packages for commercial extensions with no
    /// curated official alternative
    pub emit_placeholders: bool,
    /// Keep an unpacked directory copy beside archive artifacts, for
    /// temporary-install workflows
    pub keep_unpacked: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            emit_placeholders: false,
            keep_unpacked: true,
        }
    }
}

/// What happened to one extension
#[derive(Debug)]
pub enum ConversionOutcome {
    Converted {
        artifact: PackageArtifact,
        unpacked: Option<PathBuf>,
        skip_report: SkipReport,
        validation: ValidationResult,
    },
    /// A curated official release exists in the target store; nothing
    /// was packaged
    OfficialAlternative(OfficialAlternative),
    /// Commercial extension replaced by an inert placeholder package
    Placeholder {
        artifact: PackageArtifact,
        suggestions: Vec<AlternativeCandidate>,
    },
    /// Commercial extension skipped without a placeholder
    SkippedCommercial {
        suggestions: Vec<AlternativeCandidate>,
    },
}

/// Per-extension result, failure included
#[derive(Debug)]
pub struct ExtensionReport {
    pub descriptor: ExtensionDescriptor,
    pub display_name: String,
    pub outcome: ExtResult<ConversionOutcome>,
}

/// Batch-level results, one report per extension
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<ExtensionReport>,
}

impl BatchSummary {
    pub fn converted(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Converted { .. }))
    }

    pub fn placeholders(&self) -> usize {
        self.count(|o| matches!(o, ConversionOutcome::Placeholder { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                ConversionOutcome::OfficialAlternative(_) | ConversionOutcome::SkippedCommercial { .. }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_err()).count()
    }

    fn count(&self, pred: impl Fn(&ConversionOutcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(&r.outcome, Ok(o) if pred(o)))
            .count()
    }

    /// Print the per-extension success/skip-count/failure summary
    pub fn print(&self) {
        println!("\nConversion summary:");
        for report in &self.reports {
            match &report.outcome {
                Ok(ConversionOutcome::Converted {
                    artifact,
                    unpacked,
                    skip_report,
                    validation,
                }) => {
                    println!("✓ {} -> {}", report.display_name, artifact.path.display());
                    if let Some(dir) = unpacked {
                        println!("  Unpacked version (for temporary loading): {}", dir.display());
                    }
                    if !skip_report.skipped.is_empty() {
                        println!(
                            "  Skipped {} of {} files:",
                            skip_report.skipped.len(),
                            skip_report.total_files
                        );
                        for (path, reason) in skip_report.top_offenders(5) {
                            println!("    - {} ({})", path.display(), reason);
                        }
                        if skip_report.skipped.len() > 5 {
                            println!("    ... and {} more", skip_report.skipped.len() - 5);
                        }
                    }
                    if skip_report.mostly_skipped() {
                        println!("  ⚠️  More than half of the files were skipped; the package is likely non-functional");
                    }
                    if !validation.ok {
                        if let Some(reason) = &validation.reason {
                            println!("  ⚠️  Validation: {}", reason);
                        }
                    }
                }
                Ok(ConversionOutcome::OfficialAlternative(alt)) => {
                    println!(
                        "✓ {}: official version available, not converted: {} ({})",
                        report.display_name, alt.name, alt.url
                    );
                }
                Ok(ConversionOutcome::Placeholder { artifact, .. }) => {
                    println!(
                        "✓ {}: placeholder package at {}",
                        report.display_name,
                        artifact.path.display()
                    );
                }
                Ok(ConversionOutcome::SkippedCommercial { suggestions }) => {
                    println!(
                        "⚠️  {}: commercial extension, not converted",
                        report.display_name
                    );
                    for s in suggestions.iter().take(3) {
                        let rating = s
                            .rating
                            .map(|r| format!(", rated {:.1}", r))
                            .unwrap_or_default();
                        println!("    Alternative: {} ({} users{}) {}", s.name, s.user_count, rating, s.url);
                    }
                }
                Err(e) => {
                    println!("⚠️  {} failed: {}", report.display_name, e);
                }
            }
        }
        println!(
            "\n{} converted, {} placeholders, {} skipped, {} failed",
            self.converted(),
            self.placeholders(),
            self.skipped(),
            self.failed()
        );
    }
}

/// Sequences the conversion pipeline per extension, isolating failures
/// so one extension's failure never aborts the batch.
pub struct ConversionOrchestrator {
    target: TargetFormat,
    output_root: PathBuf,
    curated: CuratedLists,
    search: SearchApi,
    options: ConversionOptions,
}

impl ConversionOrchestrator {
    pub fn new(
        target: TargetFormat,
        output_root: PathBuf,
        curated: CuratedLists,
        search: SearchApi,
        options: ConversionOptions,
    ) -> Self {
        Self {
            target,
            output_root,
            curated,
            search,
            options,
        }
    }

    /// Output directory for this run's target format
    pub fn target_dir(&self) -> PathBuf {
        self.output_root.join(self.target.name())
    }

    /// Convert a batch of extensions.
    ///
    /// Every error is caught at this boundary and turned into a
    /// per-extension failure report; the batch always runs to the end.
    pub async fn convert_all(&self, descriptors: &[ExtensionDescriptor]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let mut used_slugs = HashSet::new();

        let pb = ProgressBar::new(descriptors.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} extensions")
                .unwrap()
                .progress_chars("#>-"),
        );

        for descriptor in descriptors {
            let outcome = self.convert_one(descriptor, &mut used_slugs).await;
            if let Err(e) = &outcome {
                warn!("Conversion of '{}' failed: {}", descriptor.id, e);
            }
            summary.reports.push(ExtensionReport {
                descriptor: descriptor.clone(),
                display_name: descriptor.display_name.clone(),
                outcome,
            });
            pb.inc(1);
        }

        pb.finish_and_clear();
        summary
    }

    /// Run the whole pipeline for one extension:
    /// resolve → classify → transform → materialize → build → validate
    pub async fn convert_one(
        &self,
        descriptor: &ExtensionDescriptor,
        used_slugs: &mut HashSet<String>,
    ) -> ExtResult<ConversionOutcome> {
        let manifest = Manifest::load(&descriptor.source_dir)?;
        let resolved = resolve_name(&manifest, &descriptor.id, &descriptor.source_dir);

        if self.curated.classify(&descriptor.id) == Classification::Commercial {
            return self.convert_commercial(descriptor, &resolved).await;
        }

        let transformed = transform(&manifest, &resolved.display_name, self.target);

        let target_dir = self.target_dir();
        ensure_dir(&target_dir)?;
        let output_slug = self.claim_slug(&resolved.display_name, &descriptor.id, used_slugs);

        // Fire-and-forget: runs concurrently with file copying/zipping,
        // joined with a bound just before reporting
        let lookup = {
            let search = self.search.clone();
            let name = resolved.display_name.clone();
            tokio::spawn(async move { search.search_alternatives(&name).await })
        };

        let staging = tempfile::tempdir()?;
        let skip_report = copy_tree(&descriptor.source_dir, staging.path())?;
        if skip_report.mostly_skipped() {
            warn!(
                "More than half of '{}' was skipped during materialization",
                resolved.display_name
            );
        }

        if self.target.is_archive() {
            write_tooling_sidecar(staging.path(), &resolved.display_name, &transformed)?;
        }

        let output_path = match self.target.archive_extension() {
            Some(ext) => target_dir.join(format!("{}.{}", output_slug, ext)),
            None => target_dir.join(&output_slug),
        };
        let artifact =
            PackageBuilder::new(self.target).build(staging.path(), &transformed, &output_path)?;

        let unpacked = if artifact.kind == ArtifactKind::Archive && self.options.keep_unpacked {
            let dir = target_dir.join(&output_slug);
            match PackageBuilder::build_directory(staging.path(), &transformed, &dir) {
                Ok(a) => Some(a.path),
                Err(e) => {
                    warn!("Could not write unpacked copy for '{}': {}", resolved.display_name, e);
                    None
                }
            }
        } else {
            None
        };

        let validation = PackageValidator::validate(&artifact, &resolved.display_name);
        if !validation.ok {
            // The artifact is kept; the unpacked copy may still be usable
            warn!(
                "Validation failed for '{}': {}",
                resolved.display_name,
                validation.reason.as_deref().unwrap_or("unknown")
            );
        }

        // Bounded join: surface lookup results if they arrived in time
        match tokio::time::timeout(LOOKUP_JOIN_TIMEOUT, lookup).await {
            Ok(Ok(suggestions)) => {
                if let Some(best) = suggestions.first() {
                    info!(
                        "'{}' also exists in the target store: {} ({})",
                        resolved.display_name, best.name, best.url
                    );
                }
            }
            Ok(Err(e)) => debug!("Alternative lookup task failed: {}", e),
            Err(_) => debug!(
                "Alternative lookup for '{}' still pending; not waiting",
                resolved.display_name
            ),
        }

        Ok(ConversionOutcome::Converted {
            artifact,
            unpacked,
            skip_report,
            validation,
        })
    }

    async fn convert_commercial(
        &self,
        descriptor: &ExtensionDescriptor,
        resolved: &ResolvedName,
    ) -> ExtResult<ConversionOutcome> {
        if let Some(alternative) = self.curated.official_alternative(&descriptor.id) {
            info!(
                "'{}' has an official release in the target store: {}",
                resolved.display_name, alternative.url
            );
            return Ok(ConversionOutcome::OfficialAlternative(alternative.clone()));
        }

        let suggestions = self.search.search_alternatives(&resolved.display_name).await;

        if self.options.emit_placeholders {
            let target_dir = self.target_dir();
            ensure_dir(&target_dir)?;
            let artifact =
                PlaceholderBuilder::new(self.target).build(&resolved.display_name, &target_dir)?;
            Ok(ConversionOutcome::Placeholder {
                artifact,
                suggestions,
            })
        } else {
            Ok(ConversionOutcome::SkippedCommercial { suggestions })
        }
    }

    /// Claim a unique output slug within this batch.
    ///
    /// Two extensions sanitizing to the same name would otherwise race
    /// on one output path; the second gets an id-derived suffix instead
    /// of silently overwriting the first.
    fn claim_slug(
        &self,
        display_name: &str,
        extension_id: &str,
        used: &mut HashSet<String>,
    ) -> String {
        let base = slug(display_name);
        let claimed = if used.contains(&base) {
            let prefix: String = extension_id.chars().take(8).collect();
            format!("{}-{}", base, prefix)
        } else {
            base
        };
        used.insert(claimed.clone());
        claimed
    }
}

/// Write an npm-style `package.json` beside the staged manifest so
/// web-ext based tooling can operate on the unpacked copy.
fn write_tooling_sidecar(
    staging: &Path,
    display_name: &str,
    manifest: &TransformedManifest,
) -> ExtResult<()> {
    let sidecar = serde_json::json!({
        "name": sanitize_name(display_name).to_lowercase().replace(' ', "-"),
        "version": manifest.version().unwrap_or("1.0"),
        "description": manifest
            .description()
            .unwrap_or("Converted browser extension"),
        "main": "manifest.json"
    });
    fs::write(
        staging.join("package.json"),
        serde_json::to_string_pretty(&sidecar)?,
    )?;
    Ok(())
}
