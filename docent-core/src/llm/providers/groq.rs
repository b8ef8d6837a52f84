//! Groq LLM provider implementation
//!
//! Speaks the OpenAI-compatible `/chat/completions` protocol, including
//! function-style tool calling, so it also works against any endpoint that
//! implements that protocol when given a different base URL.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DocentError, Result};
use crate::llm::{
    LLMProvider, Message, MessageRole, ModelInfo, ModelRequest, ModelResponse, TokenUsage,
    ToolCall, ToolDefinition,
};

/// Default Groq endpoint
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when neither config nor `GROQ_MODEL` names one
pub const DEFAULT_GROQ_MODEL: &str = "openai/gpt-oss-20b";

/// Groq LLM provider.
pub struct GroqProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqProvider {
    /// Create a new Groq provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Groq API key
    /// * `model` - Model name (e.g., "openai/gpt-oss-20b")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, GROQ_BASE_URL)
    }

    /// Create a provider pointed at a custom OpenAI-compatible endpoint.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads from:
    /// - `GROQ_API_KEY` - API key (required)
    /// - `GROQ_MODEL` - Model name (optional, defaults to [`DEFAULT_GROQ_MODEL`])
    ///
    /// # Errors
    ///
    /// Returns an error if GROQ_API_KEY is not set.
    pub fn from_env(model: Option<impl Into<String>>) -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            DocentError::Configuration("GROQ_API_KEY environment variable not set".to_string())
        })?;

        let model = model
            .map(|m| m.into())
            .or_else(|| std::env::var("GROQ_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());

        Ok(Self::new(api_key, model))
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the endpoint base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_request(&self, request: &ModelRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system_message.is_empty() {
            messages.push(ChatMessage {
                role: MessageRole::System.as_str().to_string(),
                content: Some(request.system_message.clone()),
                tool_calls: None,
                tool_call_id: None,
            });
        }
        messages.extend(request.messages.iter().map(ChatMessage::from));

        ChatRequest {
            model: self.model.clone(),
            messages,
            tools: if request.tools.is_empty() {
                None
            } else {
                Some(request.tools.iter().map(ChatTool::from).collect())
            },
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ChatTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ChatToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(message.tool_calls.iter().map(ChatToolCall::from).collect())
        };

        Self {
            role: message.role.as_str().to_string(),
            content: Some(message.content.clone()),
            tool_calls,
            tool_call_id: message.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatToolCall {
    id: String,
    #[serde(rename = "type", default = "function_type")]
    kind: String,
    function: ChatFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatFunctionCall {
    name: String,
    /// JSON-encoded arguments, as the protocol transmits them
    arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

impl From<&ToolCall> for ChatToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: function_type(),
            function: ChatFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments_text(),
            },
        }
    }
}

impl From<ChatToolCall> for ToolCall {
    fn from(call: ChatToolCall) -> Self {
        match serde_json::from_str(&call.function.arguments) {
            Ok(arguments) => ToolCall::new(call.id, call.function.name, arguments),
            Err(e) => {
                tracing::warn!(
                    tool = %call.function.name,
                    call_id = %call.id,
                    error = %e,
                    "Tool call arguments are not valid JSON"
                );
                ToolCall::unparsed(call.id, call.function.name, call.function.arguments)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: ChatFunction,
}

#[derive(Debug, Serialize)]
struct ChatFunction {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolDefinition> for ChatTool {
    fn from(tool: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: ChatFunction {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

fn parse_response(response: ChatResponse) -> Result<ModelResponse> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DocentError::ModelCall("Groq API returned no choices".to_string()))?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(ToolCall::from)
        .collect();
    let content = choice.message.content.unwrap_or_default();

    let mut model_response =
        ModelResponse::new(Message::assistant_with_tool_calls(content, tool_calls));
    if let Some(u) = response.usage {
        model_response = model_response.with_usage(TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
    }
    Ok(model_response)
}

#[async_trait]
impl LLMProvider for GroqProvider {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        let chat_request = self.build_request(request);
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(
            model = %self.model,
            messages = chat_request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| DocentError::ModelCall(format!("Failed to send request to Groq: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocentError::ModelCall(format!(
                "Groq API error ({}): {}",
                status, text
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            DocentError::ModelCall(format!("Failed to parse Groq response: {}", e))
        })?;

        parse_response(chat_response)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "groq".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_groq_provider_creation() {
        let provider = GroqProvider::new("test-key", "openai/gpt-oss-20b");
        assert_eq!(provider.model(), "openai/gpt-oss-20b");
        assert_eq!(provider.base_url(), GROQ_BASE_URL);

        let provider = GroqProvider::with_base_url("k", "m", "http://localhost:8080/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_request_wire_format() {
        let provider = GroqProvider::new("test-key", "test-model");
        let request = ModelRequest::new(
            "You are a SQL assistant.",
            vec![
                Message::user("Top customers?"),
                Message::assistant_with_tool_calls(
                    "",
                    vec![ToolCall::new(
                        "call_1",
                        "load_skill",
                        json!({"skill_name": "sales_analytics"}),
                    )],
                ),
                Message::tool_result("call_1", "Loaded skill: sales_analytics\n\nSCHEMA X"),
            ],
        )
        .with_tools(vec![ToolDefinition {
            name: "load_skill".to_string(),
            description: "Load a skill".to_string(),
            parameters: json!({"type": "object"}),
        }]);

        let wire = serde_json::to_value(provider.build_request(&request)).unwrap();
        assert_eq!(wire["model"], "test-model");
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][0]["content"], "You are a SQL assistant.");
        assert_eq!(wire["messages"][2]["tool_calls"][0]["type"], "function");
        assert_eq!(
            wire["messages"][2]["tool_calls"][0]["function"]["arguments"],
            "{\"skill_name\":\"sales_analytics\"}"
        );
        assert_eq!(wire["messages"][3]["role"], "tool");
        assert_eq!(wire["messages"][3]["tool_call_id"], "call_1");
        assert_eq!(wire["tools"][0]["function"]["name"], "load_skill");
        assert!(wire.get("temperature").is_none());
    }

    #[test]
    fn test_parse_tool_call_response() {
        let raw = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {
                            "name": "load_skill",
                            "arguments": "{\"skill_name\":\"inventory_management\"}"
                        }
                    }]
                }
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        });

        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        assert_eq!(response.message.role, MessageRole::Assistant);
        assert_eq!(response.message.content, "");
        assert_eq!(
            response.tool_calls(),
            &[ToolCall::new(
                "call_9",
                "load_skill",
                json!({"skill_name": "inventory_management"})
            )]
        );
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_unparseable_arguments_kept_raw() {
        let raw = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {"name": "load_skill", "arguments": "{skill_name: oops"}
                    }]
                }
            }]
        });

        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        let call = &response.tool_calls()[0];
        assert_eq!(call.arguments, Value::Null);
        assert_eq!(call.raw_arguments.as_deref(), Some("{skill_name: oops"));

        let echoed = ChatToolCall::from(call);
        assert_eq!(echoed.function.arguments, "{skill_name: oops");
    }

    #[test]
    fn test_json_string_arguments_round_trip_as_json() {
        let raw = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {"name": "load_skill", "arguments": "\"sales_analytics\""}
                    }]
                }
            }]
        });

        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        let call = &response.tool_calls()[0];
        assert_eq!(call.arguments, Value::String("sales_analytics".to_string()));
        assert!(call.raw_arguments.is_none());

        let echoed = ChatToolCall::from(call);
        assert_eq!(echoed.function.arguments, "\"sales_analytics\"");
    }

    #[test]
    fn test_empty_choices_is_model_error() {
        let raw = json!({"choices": []});
        let err = parse_response(serde_json::from_value(raw).unwrap()).unwrap_err();
        assert!(matches!(err, DocentError::ModelCall(_)));
    }
}
