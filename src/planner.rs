use crate::agent::Agent;
use anyhow::{Context, Result};

/// The five criteria collected from the user. Free text; the collaborator
/// that gathers them checks non-emptiness via `validate` before the core
/// is ever invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningRequest {
    /// Venue area, e.g. "渋谷"
    pub area: String,
    /// Date and time, free form
    pub datetime_text: String,
    /// What kind of gathering this is
    pub group_desc: String,
    /// Per-person budget
    pub budget: String,
    /// Desired atmosphere
    pub mood: String,
}

/// A required field was left empty.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("「{0}」が入力されていません。すべての項目を入力してください。")]
pub struct MissingField(pub &'static str);

impl PlanningRequest {
    /// Report the first empty field, if any. Whitespace-only counts as
    /// empty.
    pub fn validate(&self) -> Result<(), MissingField> {
        let fields = [
            ("お店のエリア", &self.area),
            ("日時", &self.datetime_text),
            ("どんな集まりか", &self.group_desc),
            ("1人当たりの予算", &self.budget),
            ("お店の雰囲気", &self.mood),
        ];

        for (label, value) in fields {
            if value.trim().is_empty() {
                return Err(MissingField(label));
            }
        }
        Ok(())
    }
}

/// Build the instruction handed to the agent.
///
/// Pure and deterministic: the five fields are interpolated verbatim, each
/// under its fixed label in fixed order, followed by the fixed closing
/// instructions. Field-wise equal requests produce byte-identical output.
pub fn build_prompt(request: &PlanningRequest) -> String {
    format!(
        "以下の条件で懇親会のお店を提案してください。\n\n\
         ・お店のエリア: {}\n\
         ・日時: {}\n\
         ・どんな集まりか: {}\n\
         ・1人当たりの予算: {}\n\
         ・お店の雰囲気: {}\n\n\
         条件に合いそうなお店を、できれば複数候補挙げてください。\n\
         それぞれについて、想定される1人あたりの金額の目安と、お店のURLも示してください。\n\
         必要であれば web_search ツールを呼び出して、実在するお店を検索して構いません。",
        request.area, request.datetime_text, request.group_desc, request.budget, request.mood
    )
}

/// Orchestration: prompt → one agent invocation → final response.
///
/// Trusts its input (validation is the collaborator's job) and performs no
/// retries; an agent failure propagates and the request terminates with no
/// partial result.
pub async fn plan(agent: &dyn Agent, request: &PlanningRequest) -> Result<String> {
    let prompt = build_prompt(request);

    tracing::info!(area = %request.area, "planning request submitted");

    agent
        .respond(&prompt)
        .await
        .context("Agent 実行中にエラーが発生しました")
}
