use crate::search::{SearchError, SearchHit, SearchProvider, SearchQuery};
use std::time::Duration;

/// Brave Search API provider
///
/// Requires an API key (BRAVE_API_KEY or config).
/// Free tier: 2000 requests/month
/// Documentation: https://brave.com/search/api/
pub struct BraveSearchProvider {
    client: reqwest::Client,
    api_key: String,
}

impl BraveSearchProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        if api_key.is_empty() {
            tracing::warn!("brave api key not set, web searches will fail");
        }

        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap(),
            api_key,
        }
    }

    /// Split a "jp-ja" style locale code into Brave's country / search_lang
    /// parameters. Unparseable input falls back to the raw value as country.
    fn region_params(region: &str) -> (String, String) {
        match region.split_once('-') {
            Some((country, lang)) if !country.is_empty() && !lang.is_empty() => {
                (country.to_uppercase(), lang.to_lowercase())
            }
            _ => (region.to_uppercase(), "ja".to_string()),
        }
    }

    /// Extract normalized hits from a Brave web-search response body.
    /// Missing fields become empty strings; provider order is preserved.
    fn parse_hits(json: &serde_json::Value, max_results: usize) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        if let Some(web_results) = json["web"]["results"].as_array() {
            for result in web_results {
                hits.push(SearchHit {
                    title: result["title"].as_str().unwrap_or("").to_string(),
                    url: result["url"].as_str().unwrap_or("").to_string(),
                    summary: result["description"].as_str().unwrap_or("").to_string(),
                });

                if hits.len() >= max_results {
                    break;
                }
            }
        }
        hits
    }
}

#[async_trait::async_trait]
impl SearchProvider for BraveSearchProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::InvalidApiKey);
        }

        let url = "https://api.search.brave.com/res/v1/web/search";
        let (country, search_lang) = Self::region_params(&query.region);

        tracing::debug!(
            keywords = %query.keywords,
            region = %query.region,
            max_results = query.max_results,
            "performing brave search"
        );

        let response = self
            .client
            .get(url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("q", query.keywords.as_str()),
                ("count", &query.max_results.to_string()),
                ("country", &country),
                ("search_lang", &search_lang),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %error_text,
                "brave search api error"
            );

            return match status.as_u16() {
                401 | 403 => Err(SearchError::InvalidApiKey),
                429 => Err(SearchError::RateLimited),
                _ => Err(SearchError::Api(format!("HTTP {}: {}", status, error_text))),
            };
        }

        let json: serde_json::Value = response.json().await?;
        let hits = Self::parse_hits(&json, query.max_results);

        tracing::debug!(
            keywords = %query.keywords,
            hit_count = hits.len(),
            "brave search completed"
        );

        Ok(hits)
    }
}
