use crate::config::LlmConfig;
use crate::llm::types::{AssistantTurn, Message, ToolUse};
use anyhow::{Context, Result};
use eventsource_stream::Eventsource;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Anthropic Messages API client
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    config: LlmConfig,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Run one streaming completion and assemble the whole assistant turn.
    ///
    /// The SSE stream is drained here; callers get the completed turn with
    /// its text and any requested tool calls.
    pub async fn complete_turn(
        &self,
        system: &str,
        messages: Vec<Message>,
        tools: Option<Vec<serde_json::Value>>,
    ) -> Result<AssistantTurn> {
        let api_base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or("https://api.anthropic.com");

        let url = format!("{}/v1/messages", api_base);

        tracing::debug!(
            api_base = %api_base,
            model = %self.config.model,
            message_count = messages.len(),
            tool_count = tools.as_ref().map(|t| t.len()).unwrap_or(0),
            "anthropic complete_turn request"
        );

        let request_body = CreateMessageRequest {
            model: self.config.model.clone(),
            system: system.to_string(),
            messages,
            max_tokens: self.config.max_tokens.unwrap_or(8192),
            temperature: self.config.temperature,
            stream: true,
            tools,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .context("Network error: failed to reach the Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "anthropic api returned error"
            );

            let error_msg = match status.as_u16() {
                401 => format!(
                    "Unauthorized (401): invalid or missing API key. Check the [llm] api_key in your config.\n\nDetails: {}",
                    error_text
                ),
                429 => format!(
                    "Rate Limit Exceeded (429): too many requests. Wait a moment and try again.\n\nDetails: {}",
                    error_text
                ),
                400 => format!(
                    "Bad Request (400): the request was invalid.\n\nDetails: {}",
                    error_text
                ),
                500..=599 => format!(
                    "Server Error ({}): the Anthropic API is experiencing issues. Try again later.\n\nDetails: {}",
                    status, error_text
                ),
                _ => format!("API request failed ({}): {}", status, error_text),
            };

            anyhow::bail!(error_msg);
        }

        let mut events = response.bytes_stream().eventsource();
        let mut turn = AssistantTurn::default();
        let mut pending: Option<PendingToolUse> = None;

        while let Some(event) = events.next().await {
            let event = event.context("Anthropic event stream error")?;

            match event.event.as_str() {
                "content_block_start" => {
                    // Malformed events are skipped, matching the lenient
                    // handling the wire format expects.
                    let Ok(start) = serde_json::from_str::<ContentBlockStart>(&event.data) else {
                        continue;
                    };

                    if start.content_block.block_type == "tool_use" {
                        let (Some(id), Some(name)) =
                            (start.content_block.id, start.content_block.name)
                        else {
                            continue;
                        };

                        tracing::debug!(tool_id = %id, tool_name = %name, "anthropic tool_use start");

                        pending = Some(PendingToolUse {
                            id,
                            name,
                            input: start.content_block.input,
                            input_json: String::new(),
                        });
                    }
                }
                "content_block_delta" => {
                    let Ok(delta) = serde_json::from_str::<ContentBlockDelta>(&event.data) else {
                        continue;
                    };

                    match delta.delta.delta_type.as_str() {
                        "text_delta" => {
                            if let Some(text) = delta.delta.text {
                                turn.text.push_str(&text);
                            }
                        }
                        "input_json_delta" => {
                            if let (Some(p), Some(partial)) =
                                (pending.as_mut(), delta.delta.partial_json)
                            {
                                p.input_json.push_str(&partial);
                            }
                        }
                        _ => {}
                    }
                }
                "content_block_stop" => {
                    let Some(p) = pending.take() else {
                        continue;
                    };

                    let input = if p.input_json.trim().is_empty() {
                        p.input
                    } else {
                        serde_json::from_str::<serde_json::Value>(&p.input_json).with_context(
                            || format!("Failed to parse tool input JSON for '{}'", p.name),
                        )?
                    };

                    turn.tool_uses.push(ToolUse {
                        id: p.id,
                        name: p.name,
                        input,
                    });
                }
                "message_stop" => break,
                _ => {}
            }
        }

        Ok(turn)
    }
}

/// Request body for creating a message
#[derive(Debug, Serialize)]
struct CreateMessageRequest {
    model: String,
    system: String,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

/// Content block start event (for tool_use)
#[derive(Debug, Deserialize)]
struct ContentBlockStart {
    content_block: ContentBlockData,
}

#[derive(Debug, Deserialize)]
struct ContentBlockData {
    #[serde(rename = "type")]
    block_type: String,
    id: Option<String>,
    name: Option<String>,
    #[serde(default = "default_tool_input")]
    input: serde_json::Value,
}

/// Content block delta event
#[derive(Debug, Deserialize)]
struct ContentBlockDelta {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(rename = "type")]
    delta_type: String,
    text: Option<String>,
    partial_json: Option<String>,
}

fn default_tool_input() -> serde_json::Value {
    serde_json::json!({})
}

struct PendingToolUse {
    id: String,
    name: String,
    input: serde_json::Value,
    input_json: String,
}
