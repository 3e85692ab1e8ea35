use crate::search::{
    SearchOutcome, SearchProvider, SearchQuery, DEFAULT_MAX_RESULTS, DEFAULT_REGION,
};
use crate::tool::base::{Tool, ToolContext, ToolError, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Web search tool - the one capability the planning agent may invoke.
///
/// Every provider outcome, including throttling and outright faults, is
/// rendered as plain text: the model consumes tool output as a single
/// string and has no structured error channel. One outbound request per
/// call; no caching, no retries - whether to search again is the agent's
/// decision.
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
    default_region: String,
    default_max_results: usize,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self::with_defaults(provider, DEFAULT_REGION, DEFAULT_MAX_RESULTS)
    }

    /// Override the schema defaults, e.g. from the `[search]` config table.
    pub fn with_defaults(
        provider: Arc<dyn SearchProvider>,
        region: impl Into<String>,
        max_results: usize,
    ) -> Self {
        Self {
            provider,
            default_region: region.into(),
            default_max_results: max_results.max(1),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WebSearchParams {
    keywords: String,
    region: Option<String>,
    max_results: Option<usize>,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn id(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Web検索を行い、ヒットしたページのタイトル・URL・概要を日本語のテキストで返します。\
         実在するお店や施設を調べるときに使ってください。\
         結果が見つからない場合やプロバイダ側のエラーもテキストとして返るので、\
         内容を読んで検索し直すか、そのままユーザーへの回答に反映してください。"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "keywords": {
                    "type": "string",
                    "description": "検索キーワード。例: \"渋谷 居酒屋 個室\""
                },
                "region": {
                    "type": "string",
                    "default": self.default_region,
                    "description": "検索対象のロケールコード"
                },
                "max_results": {
                    "type": "integer",
                    "default": self.default_max_results,
                    "minimum": 1,
                    "description": "返す検索結果の最大件数"
                }
            },
            "required": ["keywords"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        _ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let params: WebSearchParams = serde_json::from_value(params)
            .map_err(|e| ToolError::InvalidParams(e.to_string()))?;

        let query = SearchQuery {
            keywords: params.keywords,
            region: params
                .region
                .unwrap_or_else(|| self.default_region.clone()),
            max_results: params.max_results.unwrap_or(self.default_max_results).max(1),
        };

        // Empty keywords are forwarded, not rejected; the provider's own
        // no-results answer comes back as the fixed empty-outcome text.
        let outcome = SearchOutcome::from_provider(self.provider.search(&query).await);

        let hit_count = match &outcome {
            SearchOutcome::Hits(hits) => hits.len(),
            _ => 0,
        };

        tracing::debug!(keywords = %query.keywords, hit_count, "web search finished");

        Ok(
            ToolResult::new(format!("Web検索: {}", query.keywords), outcome.render())
                .with_metadata("num_results", json!(hit_count))
                .with_metadata("keywords", json!(query.keywords)),
        )
    }
}
