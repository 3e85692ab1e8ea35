use crate::llm::anthropic::AnthropicClient;
use crate::llm::types::Message;
use crate::tool::base::ToolContext;
use crate::tool::ToolRegistry;
use anyhow::Result;
use std::sync::Arc;

/// Fixed persona for the planning agent. The model must weigh group size,
/// age range and formality, may call web_search as needed, and always
/// answers in Japanese.
pub const SYSTEM_PROMPT: &str = "あなたはプロの飲み会プランナーです。\
    ユーザーが提示した条件に対して、最適なお店を提案して下さい。\
    参加者の年齢層や人数やどのような集まりなのかを考慮し、\
    カジュアルな友人との飲み会から、フォーマルな仕事付き合いの飲み会まで、\
    状況に応じて最適なお店を考えてください。\
    必要に応じて web_search ツールを使用し、候補となるお店名・平均的な金額・URLをまとめてください。\
    返答は必ず日本語で行ってください。";

/// The seam between orchestration and the model runtime: one instruction
/// string in, one final response string out.
#[async_trait::async_trait]
pub trait Agent: Send + Sync {
    async fn respond(&self, prompt: &str) -> Result<String>;
}

/// Agent runner: drives the model/tool turn loop for one request.
///
/// Constructed once at startup and passed explicitly to the orchestration;
/// conversation state lives inside a single `run` call, so independent
/// requests share nothing.
pub struct AgentRunner {
    llm_client: AnthropicClient,
    tool_registry: Arc<ToolRegistry>,
    session_id: String,
}

impl AgentRunner {
    pub fn new(llm_client: AnthropicClient, tool_registry: Arc<ToolRegistry>) -> Self {
        Self {
            llm_client,
            tool_registry,
            session_id: "session_1".to_string(),
        }
    }

    pub fn tool_registry(&self) -> Arc<ToolRegistry> {
        self.tool_registry.clone()
    }

    /// Run one user request to completion.
    ///
    /// Calls the model with the registered tool definitions, executes each
    /// requested tool call, feeds results back, and repeats until a turn
    /// requests no tools. Tool failures become error tool_results for the
    /// model to read; only model-call failures abort the run.
    pub async fn run(&self, user_text: String) -> Result<String> {
        let mut conversation = vec![Message::user(user_text)];
        let tool_definitions = self.tool_registry.list_tool_definitions();

        loop {
            let turn = self
                .llm_client
                .complete_turn(
                    SYSTEM_PROMPT,
                    conversation.clone(),
                    Some(tool_definitions.clone()),
                )
                .await?;

            let tool_uses = turn.tool_uses.clone();
            let final_text = turn.text.clone();

            if tool_uses.is_empty() {
                if !final_text.is_empty() {
                    conversation.push(Message::assistant(final_text.clone()));
                }
                return Ok(final_text);
            }

            conversation.push(Message::assistant_with_blocks(turn.into_blocks()));

            for tool_use in tool_uses {
                let ctx = ToolContext::new(self.session_id.clone(), tool_use.id.clone());

                let (content, is_error) = match self.tool_registry.get(&tool_use.name) {
                    None => (format!("Tool '{}' not found", tool_use.name), true),
                    Some(tool) => match tool.execute(tool_use.input, &ctx).await {
                        Ok(result) => (
                            format!("Tool: {}\nOutput:\n{}", result.title, result.output),
                            false,
                        ),
                        Err(e) => (format!("Tool execution failed: {}", e), true),
                    },
                };

                tracing::debug!(
                    tool_name = %tool_use.name,
                    is_error,
                    "tool execution finished"
                );

                conversation.push(Message::user_with_tool_result(
                    tool_use.id,
                    content,
                    if is_error { Some(true) } else { None },
                ));
            }

            // Loop: call the model again with the tool results appended.
        }
    }
}

#[async_trait::async_trait]
impl Agent for AgentRunner {
    async fn respond(&self, prompt: &str) -> Result<String> {
        self.run(prompt.to_string()).await
    }
}
