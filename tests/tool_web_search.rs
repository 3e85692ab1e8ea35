//! Integration tests for the web_search tool against stub providers.
//!
//! Every provider outcome must land in the model-facing output as plain
//! text; no branch may propagate a provider failure out of `execute`.

mod common;

use common::{hit, StubProvider};
use nomikai::search::{SearchError, NO_RESULTS_TEXT, RATE_LIMIT_TEXT};
use nomikai::tool::base::{Tool, ToolContext};
use nomikai::tool::web_search::WebSearchTool;
use serde_json::json;
use std::sync::Arc;

fn test_context() -> ToolContext {
    ToolContext::new("test_session", "test_msg")
}

#[tokio::test]
async fn test_hits_format_as_numbered_records() {
    let provider = Arc::new(StubProvider::with_hits(vec![
        hit("居酒屋A", "https://example.com/a", "渋谷駅徒歩3分"),
        hit("居酒屋B", "https://example.com/b", "個室・飲み放題"),
    ]));
    let tool = WebSearchTool::new(provider);

    let result = tool
        .execute(json!({"keywords": "渋谷 居酒屋"}), &test_context())
        .await
        .unwrap();

    assert_eq!(
        result.output,
        "1. 居酒屋A\nURL: https://example.com/a\n概要: 渋谷駅徒歩3分\n\n\
         2. 居酒屋B\nURL: https://example.com/b\n概要: 個室・飲み放題"
    );
    assert_eq!(result.metadata.get("num_results"), Some(&json!(2)));
}

#[tokio::test]
async fn test_empty_summaries_leave_empty_line_after_label() {
    let provider = Arc::new(StubProvider::with_hits(vec![
        hit("店1", "https://example.com/1", ""),
        hit("店2", "https://example.com/2", ""),
        hit("店3", "https://example.com/3", ""),
    ]));
    let tool = WebSearchTool::new(provider);

    let result = tool
        .execute(
            json!({"keywords": "渋谷 居酒屋", "max_results": 3}),
            &test_context(),
        )
        .await
        .unwrap();

    let records: Vec<&str> = result.output.split("\n\n").collect();
    assert_eq!(records.len(), 3);
    for record in records {
        assert!(record.ends_with("概要: "), "record was: {record:?}");
    }
}

#[tokio::test]
async fn test_zero_hits_renders_fixed_no_results_text() {
    let provider = Arc::new(StubProvider::with_hits(vec![]));
    let tool = WebSearchTool::new(provider);

    let result = tool
        .execute(json!({"keywords": "存在しない店xyz"}), &test_context())
        .await
        .unwrap();

    assert_eq!(result.output, NO_RESULTS_TEXT);
    assert!(!result.output.contains("1."));
}

#[tokio::test]
async fn test_rate_limit_renders_fixed_advisory() {
    let provider = Arc::new(StubProvider::returning(Err(SearchError::RateLimited)));
    let tool = WebSearchTool::new(provider);

    let result = tool
        .execute(json!({"keywords": "渋谷 居酒屋"}), &test_context())
        .await
        .unwrap();

    assert_eq!(result.output, RATE_LIMIT_TEXT);
}

#[tokio::test]
async fn test_provider_error_is_absorbed_into_text() {
    let provider = Arc::new(StubProvider::returning(Err(SearchError::Api(
        "HTTP 400: malformed query".to_string(),
    ))));
    let tool = WebSearchTool::new(provider);

    let result = tool
        .execute(json!({"keywords": "渋谷 居酒屋"}), &test_context())
        .await;

    let result = result.expect("provider errors must not escape the tool");
    assert!(result.output.contains("検索でエラーが発生しました"));
    assert!(result.output.contains("malformed query"));
    assert_ne!(result.output, RATE_LIMIT_TEXT);
}

#[tokio::test]
async fn test_unknown_error_is_absorbed_into_text() {
    let provider = Arc::new(StubProvider::returning(Err(SearchError::Other(
        anyhow::anyhow!("connection reset by peer"),
    ))));
    let tool = WebSearchTool::new(provider);

    let result = tool
        .execute(json!({"keywords": "渋谷 居酒屋"}), &test_context())
        .await
        .unwrap();

    assert!(result.output.contains("不明なエラーが発生しました"));
    assert!(result.output.contains("connection reset by peer"));
}

#[tokio::test]
async fn test_defaults_applied_to_query() {
    let provider = Arc::new(StubProvider::with_hits(vec![hit(
        "店",
        "https://example.com",
        "概要",
    )]));
    let tool = WebSearchTool::new(provider.clone());

    tool.execute(json!({"keywords": "渋谷 居酒屋"}), &test_context())
        .await
        .unwrap();

    let queries = provider.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].region, "jp-ja");
    assert_eq!(queries[0].max_results, 5);
}

#[tokio::test]
async fn test_explicit_params_forwarded() {
    let provider = Arc::new(StubProvider::with_hits(vec![hit(
        "店",
        "https://example.com",
        "概要",
    )]));
    let tool = WebSearchTool::new(provider.clone());

    tool.execute(
        json!({"keywords": "渋谷 居酒屋", "region": "us-en", "max_results": 3}),
        &test_context(),
    )
    .await
    .unwrap();

    let queries = provider.queries.lock().unwrap();
    assert_eq!(queries[0].keywords, "渋谷 居酒屋");
    assert_eq!(queries[0].region, "us-en");
    assert_eq!(queries[0].max_results, 3);
}

#[tokio::test]
async fn test_empty_keywords_forwarded_not_rejected() {
    let provider = Arc::new(StubProvider::with_hits(vec![]));
    let tool = WebSearchTool::new(provider.clone());

    let result = tool
        .execute(json!({"keywords": ""}), &test_context())
        .await
        .unwrap();

    assert_eq!(result.output, NO_RESULTS_TEXT);
    assert_eq!(provider.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_keywords_is_a_parameter_error() {
    let provider = Arc::new(StubProvider::with_hits(vec![]));
    let tool = WebSearchTool::new(provider.clone());

    let result = tool.execute(json!({}), &test_context()).await;

    assert!(result.is_err());
    // The provider is never reached for schema violations.
    assert!(provider.queries.lock().unwrap().is_empty());
}
