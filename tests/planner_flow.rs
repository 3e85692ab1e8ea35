//! End-to-end orchestration tests with stubbed agents.

mod common;

use common::{FailingAgent, StubAgent};
use nomikai::planner::{build_prompt, plan, MissingField, PlanningRequest};

fn shibuya_request() -> PlanningRequest {
    PlanningRequest {
        area: "渋谷".to_string(),
        datetime_text: "2025/12/10 19:00".to_string(),
        group_desc: "忘年会".to_string(),
        budget: "5000".to_string(),
        mood: "賑やか".to_string(),
    }
}

#[tokio::test]
async fn test_plan_returns_agent_response_verbatim() {
    let agent = StubAgent::replying("居酒屋Aがおすすめです");

    let response = plan(&agent, &shibuya_request()).await.unwrap();

    assert_eq!(response, "居酒屋Aがおすすめです");
}

#[tokio::test]
async fn test_plan_hands_agent_the_built_prompt() {
    let agent = StubAgent::replying("了解です");
    let request = shibuya_request();

    plan(&agent, &request).await.unwrap();

    let prompts = agent.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1, "one agent invocation per request");
    assert_eq!(prompts[0], build_prompt(&request));
    for value in ["渋谷", "2025/12/10 19:00", "忘年会", "5000", "賑やか"] {
        assert!(prompts[0].contains(value));
    }
}

#[tokio::test]
async fn test_plan_propagates_agent_failure_without_retry() {
    let err = plan(&FailingAgent, &shibuya_request()).await.unwrap_err();

    assert!(err.to_string().contains("Agent 実行中にエラーが発生しました"));
    // Root cause stays attached for the log.
    assert!(format!("{err:#}").contains("model endpoint unreachable"));
}

#[tokio::test]
async fn test_validation_stops_flow_before_the_agent() {
    let agent = StubAgent::replying("呼ばれないはず");
    let mut request = shibuya_request();
    request.mood = String::new();

    let validation = request.validate();
    assert_eq!(validation.unwrap_err(), MissingField("お店の雰囲気"));

    // The collaborator never invokes the orchestration on invalid input;
    // the agent sees nothing.
    assert!(agent.prompts.lock().unwrap().is_empty());
}
