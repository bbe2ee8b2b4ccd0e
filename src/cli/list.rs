use extporter::core::{ExtError, ExtResult};
use extporter::profile::{discover_profiles, list_extensions, Browser, BrowserProfile};

pub fn run(browser: String, profile: Option<usize>) -> ExtResult<()> {
    let browser: Browser = browser.parse()?;
    let profiles = discover_profiles(browser)?;

    if profiles.is_empty() {
        println!("No {} profiles found.", browser);
        return Ok(());
    }

    match profile {
        Some(index) => {
            let selected = profiles
                .get(index.wrapping_sub(1))
                .ok_or_else(|| {
                    ExtError::Config(format!(
                        "Profile index {} out of range (1-{})",
                        index,
                        profiles.len()
                    ))
                })?;
            print_profile(selected, browser)?;
        }
        None => {
            for (i, p) in profiles.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_profile(p, browser)?;
            }
        }
    }

    Ok(())
}

fn print_profile(profile: &BrowserProfile, browser: Browser) -> ExtResult<()> {
    println!("Profile: {} ({})", profile.name, profile.path.display());

    let extensions = list_extensions(profile, browser)?;
    if extensions.is_empty() {
        println!("  No extensions installed.");
        return Ok(());
    }

    for (i, ext) in extensions.iter().enumerate() {
        println!(
            "  {}. {} v{} ({})",
            i + 1,
            ext.display_name,
            ext.version,
            ext.id
        );
    }

    Ok(())
}
