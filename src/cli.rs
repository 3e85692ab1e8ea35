use crate::agent::AgentRunner;
use crate::llm::anthropic::AnthropicClient;
use crate::planner::{plan, PlanningRequest};
use crate::search::providers::BraveSearchProvider;
use crate::tool::web_search::WebSearchTool;
use crate::tool::ToolRegistry;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Run one interactive planning session: read the five criteria, validate,
/// hand them to the agent, print the recommendation.
pub async fn run() -> Result<()> {
    let config = crate::config::load_or_create_config()?;
    let _log_guard = crate::logging::init(&config)?;

    let provider = Arc::new(BraveSearchProvider::new(config.search.brave_api_key.clone()));
    let web_search = WebSearchTool::with_defaults(
        provider,
        config.search.region.clone(),
        config.search.max_results,
    );
    let registry = Arc::new(ToolRegistry::new(vec![Arc::new(web_search)]));
    let runner = AgentRunner::new(AnthropicClient::new(config.llm.clone()), registry);

    println!("🍻 懇親会お店プランナー");
    println!("条件を入力すると、AI が Web 検索を使いながら最適なお店を提案します。\n");

    let request = PlanningRequest {
        area: read_field("お店のエリア (例: 東京駅周辺、渋谷、新宿)")?,
        datetime_text: read_field("日時 (例: 2025/12/10 19:00〜)")?,
        group_desc: read_field("どんな集まりか (例: 部署の歓送迎会、プロジェクト打ち上げ)")?,
        budget: read_field("1人当たりの予算（円） (例: 4000〜6000)")?,
        mood: read_field("お店の雰囲気 (例: 落ち着いた、にぎやか、個室あり)")?,
    };

    // Validation happens here, before the core is invoked at all.
    if let Err(e) = request.validate() {
        anyhow::bail!("{e}");
    }

    println!("\n⏳ AI がプランを検討中…\n");

    let response = match plan(&runner, &request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "agent invocation failed");
            return Err(e);
        }
    };

    println!("✅ 提案結果\n");
    println!("{}", response);

    Ok(())
}

fn read_field(label: &str) -> Result<String> {
    print!("{}: ", label);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;

    Ok(line.trim().to_string())
}
