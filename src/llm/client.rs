//! LLM client abstraction used by the research agent

use crate::types::{ChatMessage, Result, ToolCall, ToolDefinition};
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction
///
/// Implementations receive the whole conversation on every call and report
/// either assistant text or a list of requested tool invocations.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Run one chat completion over `messages`, offering `tools` to the model
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolDefinition])
        -> Result<LLMResponse>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Response from an LLM generation request
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// The text content of the response
    pub content: String,
    /// Any tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
    /// The reason generation stopped (e.g., "stop", "tool_calls", "length")
    pub finish_reason: String,
}

impl LLMResponse {
    /// Whether the model asked for at least one tool invocation
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
