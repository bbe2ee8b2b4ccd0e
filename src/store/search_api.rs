use crate::core::{ExtError, ExtResult};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// A candidate replacement extension found in the target store
#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeCandidate {
    pub name: String,
    pub rating: Option<f64>,
    pub user_count: u64,
    pub url: String,
}

/// Client for the addons.mozilla.org search API
#[derive(Debug, Clone)]
pub struct SearchApi {
    client: Client,
    base_url: String,
}

impl Default for SearchApi {
    fn default() -> Self {
        Self {
            client: Client::new(),
            base_url: "https://addons.mozilla.org".to_string(),
        }
    }
}

impl SearchApi {
    /// Create a new SearchApi instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different API host (mainly for tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Construct the search endpoint URL for a query
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/api/v5/addons/search/?q={}&app=firefox&page_size=5",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Look up alternative extensions by display name.
    ///
    /// Failures (network error, malformed response) are swallowed and
    /// treated as "no results"; this collaborator is advisory and must
    /// never propagate a fatal error into the pipeline.
    pub async fn search_alternatives(&self, display_name: &str) -> Vec<AlternativeCandidate> {
        match self.try_search(display_name).await {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Alternative search for '{}' failed: {}", display_name, e);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, display_name: &str) -> ExtResult<Vec<AlternativeCandidate>> {
        let url = self.search_url(display_name);
        let response = self.client.get(&url).send().await.map_err(ExtError::Http)?;

        if !response.status().is_success() {
            return Err(ExtError::Package(format!(
                "Search API returned HTTP {}",
                response.status()
            )));
        }

        let body: Value = response.json().await.map_err(ExtError::Http)?;
        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| ExtError::Package("Search response has no results array".to_string()))?;

        Ok(results.iter().filter_map(parse_candidate).collect())
    }
}

/// Parse one search result, skipping malformed entries
fn parse_candidate(result: &Value) -> Option<AlternativeCandidate> {
    let name = localized_string(result.get("name")?)?;
    let url = result.get("url")?.as_str()?.to_string();
    let rating = result
        .get("ratings")
        .and_then(|r| r.get("average"))
        .and_then(Value::as_f64);
    let user_count = result
        .get("average_daily_users")
        .and_then(Value::as_u64)
        .unwrap_or(0);

    Some(AlternativeCandidate {
        name,
        rating,
        user_count,
        url,
    })
}

/// AMO localizes strings as either a plain string or a locale map
fn localized_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .get("en-US")
            .or_else(|| map.values().next())
            .and_then(Value::as_str)
            .map(|s| s.to_string()),
        _ => None,
    }
}
