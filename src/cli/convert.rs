use dialoguer::{Confirm, MultiSelect, Select};
use extporter::commercial::{Classification, CuratedLists};
use extporter::config::Config;
use extporter::convert::instructions::write_install_instructions;
use extporter::convert::{ConversionOptions, ConversionOrchestrator, TargetFormat};
use extporter::core::{ExtError, ExtResult};
use extporter::profile::{discover_profiles, list_extensions, Browser, BrowserProfile, ExtensionDescriptor};
use extporter::store::SearchApi;
use std::collections::HashSet;
use std::path::PathBuf;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    ids: Vec<String>,
    all: bool,
    browser: String,
    target: String,
    profile: Option<usize>,
    output: Option<PathBuf>,
    placeholder: bool,
    yes: bool,
) -> ExtResult<()> {
    let browser: Browser = browser.parse()?;
    let target: TargetFormat = target.parse()?;
    if browser.name() == target.name() {
        return Err(ExtError::Config(format!(
            "Source and target are both {}; nothing to convert",
            browser
        )));
    }

    let config = Config::load()?;
    let output_root = match output {
        Some(path) => path,
        None => config.resolved_output_root()?,
    };

    let profiles = discover_profiles(browser)?;
    if profiles.is_empty() {
        return Err(ExtError::Profile(format!(
            "No {} profiles found",
            browser
        )));
    }
    let selected_profile = choose_profile(&profiles, profile, yes)?;

    let extensions = list_extensions(selected_profile, browser)?;
    if extensions.is_empty() {
        println!(
            "No extensions found in profile '{}'.",
            selected_profile.name
        );
        return Ok(());
    }

    let selected = select_extensions(extensions, &ids, all, yes)?;
    if selected.is_empty() {
        println!("No extensions selected.");
        return Ok(());
    }

    let curated = CuratedLists::builtin();
    let emit_placeholders =
        resolve_placeholder_policy(&selected, &curated, placeholder || config.emit_placeholders, yes)?;

    let search = SearchApi::with_base_url(config.search_base_url.clone());
    let orchestrator = ConversionOrchestrator::new(
        target,
        output_root,
        curated,
        search,
        ConversionOptions {
            emit_placeholders,
            keep_unpacked: config.keep_unpacked,
        },
    );

    println!(
        "\nConverting {} extension(s) from {} to {}...",
        selected.len(),
        browser,
        target
    );
    let summary = orchestrator.convert_all(&selected).await;
    summary.print();

    if summary.converted() + summary.placeholders() > 0 {
        if let Some(readme) = write_install_instructions(&orchestrator.target_dir(), target)? {
            println!("\nSee {} for installation options.", readme.display());
        }
    }

    Ok(())
}

fn choose_profile<'a>(
    profiles: &'a [BrowserProfile],
    index: Option<usize>,
    yes: bool,
) -> ExtResult<&'a BrowserProfile> {
    if let Some(index) = index {
        return profiles.get(index.wrapping_sub(1)).ok_or_else(|| {
            ExtError::Config(format!(
                "Profile index {} out of range (1-{})",
                index,
                profiles.len()
            ))
        });
    }

    if profiles.len() == 1 || yes {
        return Ok(&profiles[0]);
    }

    let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Select a profile")
        .items(&names)
        .default(0)
        .interact()
        .map_err(|e| ExtError::Config(format!("Failed to read input: {}", e)))?;

    Ok(&profiles[selection])
}

fn select_extensions(
    extensions: Vec<ExtensionDescriptor>,
    ids: &[String],
    all: bool,
    yes: bool,
) -> ExtResult<Vec<ExtensionDescriptor>> {
    if !ids.is_empty() {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let found: HashSet<&str> = extensions.iter().map(|e| e.id.as_str()).collect();
        for id in &wanted {
            if !found.contains(id) {
                println!("⚠️  Extension '{}' not found in this profile, skipping", id);
            }
        }
        return Ok(extensions
            .into_iter()
            .filter(|e| wanted.contains(e.id.as_str()))
            .collect());
    }

    if all || yes {
        return Ok(extensions);
    }

    let labels: Vec<String> = extensions
        .iter()
        .map(|e| format!("{} v{}", e.display_name, e.version))
        .collect();
    let selections = MultiSelect::new()
        .with_prompt("Select extensions to convert (space to toggle, enter to confirm)")
        .items(&labels)
        .interact()
        .map_err(|e| ExtError::Config(format!("Failed to read input: {}", e)))?;

    Ok(selections
        .into_iter()
        .map(|i| extensions[i].clone())
        .collect())
}

/// Decide once, before the batch starts, whether commercial extensions
/// without a curated alternative get placeholder packages.
fn resolve_placeholder_policy(
    selected: &[ExtensionDescriptor],
    curated: &CuratedLists,
    forced: bool,
    yes: bool,
) -> ExtResult<bool> {
    if forced {
        return Ok(true);
    }
    if yes {
        return Ok(false);
    }

    let needs_decision = selected.iter().any(|e| {
        curated.classify(&e.id) == Classification::Commercial
            && curated.official_alternative(&e.id).is_none()
    });
    if !needs_decision {
        return Ok(false);
    }

    Confirm::new()
        .with_prompt("Some selected extensions are commercial and cannot be converted. Emit placeholder packages for them?")
        .default(false)
        .interact()
        .map_err(|e| ExtError::Config(format!("Failed to read input: {}", e)))
}
