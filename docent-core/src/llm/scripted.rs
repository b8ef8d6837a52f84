//! Scripted provider for deterministic conversations
//!
//! Replays a fixed sequence of responses and records every request it
//! receives, so tests can assert on exactly what reached the model.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use super::{LLMProvider, Message, ModelInfo, ModelRequest, ModelResponse, ToolCall};
use crate::error::{DocentError, Result};

/// One scripted step
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this response
    Respond(ModelResponse),
    /// Fail the call with [`DocentError::ModelCall`]
    Fail(String),
}

/// Provider that returns predetermined responses in order
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: RwLock<Vec<ModelRequest>>,
    call_count: AtomicUsize,
    delay: Option<Duration>,
}

impl ScriptedProvider {
    /// Create a provider from a sequence of replies
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: RwLock::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Create a provider that answers with these messages in order
    pub fn from_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        Self::new(
            messages
                .into_iter()
                .map(|m| ScriptedReply::Respond(ModelResponse::new(m))),
        )
    }

    /// Sleep before every reply, to exercise timeouts and cancellation
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append a reply to the end of the script
    pub async fn push(&self, reply: ScriptedReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Get the number of times this provider has been called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request received so far, in order
    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.requests.read().await.clone()
    }

    /// Assistant message requesting a single tool call
    pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> Message {
        Message::assistant_with_tool_calls("", vec![ToolCall::new(id, name, arguments)])
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.write().await.push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.replies.lock().await.pop_front();
        match reply {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Fail(message)) => Err(DocentError::ModelCall(message)),
            None => Err(DocentError::ModelCall(
                "Scripted provider has no replies left".to_string(),
            )),
        }
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let provider = ScriptedProvider::from_messages([
            ScriptedProvider::tool_call("call_1", "load_skill", json!({"skill_name": "x"})),
            Message::assistant("done"),
        ]);

        let request = ModelRequest::new("sys", vec![Message::user("hi")]);
        let first = provider.complete(&request).await.unwrap();
        assert_eq!(first.tool_calls().len(), 1);

        let second = provider.complete(&request).await.unwrap();
        assert_eq!(second.message.content, "done");
        assert!(!second.message.has_tool_calls());

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let provider = ScriptedProvider::new([ScriptedReply::Fail("rate limited".to_string())]);
        let request = ModelRequest::new("sys", vec![]);

        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, DocentError::ModelCall(ref m) if m == "rate limited"));

        let err = provider.complete(&request).await.unwrap_err();
        assert!(matches!(err, DocentError::ModelCall(_)));
    }
}
