pub mod providers;

use anyhow::Result;

/// Search provider abstraction - different providers can be plugged in
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Perform one search request for the given query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, SearchError>;
}

pub const DEFAULT_REGION: &str = "jp-ja";
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// One search request as the agent issues it
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Search keywords (the agent is responsible for sending something non-empty)
    pub keywords: String,
    /// Locale code, e.g. "jp-ja"
    pub region: String,
    /// Maximum number of hits to return (>= 1)
    pub max_results: usize,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            region: DEFAULT_REGION.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// One normalized provider hit
///
/// Fields the provider omits are normalized to empty strings, never left
/// absent, so formatting code downstream has no missing-field branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub const NO_RESULTS_TEXT: &str = "検索結果が見つかりませんでした。";
pub const RATE_LIMIT_TEXT: &str =
    "検索APIのレート制限に達しました。しばらく待ってから再試行してください。";

/// Result of one search invocation, after error absorption.
///
/// Every provider call collapses into exactly one of these variants; the
/// rendering below is the only text the agent ever sees from the tool.
#[derive(Debug)]
pub enum SearchOutcome {
    /// One or more hits, in provider relevance order
    Hits(Vec<SearchHit>),
    /// The provider answered but had nothing for the query
    Empty,
    /// The provider signaled throttling
    RateLimited,
    /// A defined provider-side failure
    Provider(String),
    /// Anything else
    Unknown(String),
}

impl SearchOutcome {
    /// Collapse a provider result into an outcome. Zero hits is a success
    /// with empty content, not an error.
    pub fn from_provider(result: Result<Vec<SearchHit>, SearchError>) -> Self {
        match result {
            Ok(hits) if hits.is_empty() => SearchOutcome::Empty,
            Ok(hits) => SearchOutcome::Hits(hits),
            Err(SearchError::RateLimited) => SearchOutcome::RateLimited,
            Err(e @ SearchError::InvalidApiKey) => SearchOutcome::Provider(e.to_string()),
            Err(SearchError::Api(msg)) => SearchOutcome::Provider(msg),
            Err(SearchError::Network(e)) => SearchOutcome::Unknown(e.to_string()),
            Err(SearchError::Other(e)) => SearchOutcome::Unknown(e.to_string()),
        }
    }

    /// Render the outcome as the plain text handed back to the model.
    ///
    /// Hits become 1-indexed three-line records (title, URL line, summary
    /// line) separated by blank lines, in provider order, untruncated.
    pub fn render(&self) -> String {
        match self {
            SearchOutcome::Hits(hits) => hits
                .iter()
                .enumerate()
                .map(|(i, hit)| {
                    format!(
                        "{}. {}\nURL: {}\n概要: {}",
                        i + 1,
                        hit.title,
                        hit.url,
                        hit.summary
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n"),
            SearchOutcome::Empty => NO_RESULTS_TEXT.to_string(),
            SearchOutcome::RateLimited => RATE_LIMIT_TEXT.to_string(),
            SearchOutcome::Provider(msg) => {
                format!("検索でエラーが発生しました: {}", msg)
            }
            SearchOutcome::Unknown(msg) => {
                format!("不明なエラーが発生しました: {}", msg)
            }
        }
    }
}
