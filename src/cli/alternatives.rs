use extporter::config::Config;
use extporter::core::ExtResult;
use extporter::store::SearchApi;

pub async fn run(name: String) -> ExtResult<()> {
    let config = Config::load()?;
    let api = SearchApi::with_base_url(config.search_base_url);

    println!("Searching for alternatives to '{}'...", name);
    let candidates = api.search_alternatives(&name).await;

    if candidates.is_empty() {
        println!("No alternatives found for '{}'.", name);
        return Ok(());
    }

    for candidate in &candidates {
        let rating = candidate
            .rating
            .map(|r| format!(", rated {:.1}", r))
            .unwrap_or_default();
        println!(
            "  {} ({} users{})\n    {}",
            candidate.name, candidate.user_count, rating, candidate.url
        );
    }

    Ok(())
}
