//! Mock implementations for testing.
//!
//! Scripted stand-ins for the model and search boundaries so agent tests can
//! run without network access to OpenAI or Tavily.

#![allow(dead_code)]

use async_trait::async_trait;
use research_assistant::llm::{LLMClient, LLMResponse};
use research_assistant::tools::search::SearchProvider;
use research_assistant::tools::Tool;
use research_assistant::types::{AppError, ChatMessage, Result, ToolCall, ToolDefinition};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted model turn.
#[derive(Clone)]
pub enum Step {
    /// Plain assistant text, no tool calls
    Text(String),
    /// Assistant turn requesting tools
    Tools(Vec<ToolCall>),
    /// Assistant turn with partial text alongside tool requests
    ToolsWithText(String, Vec<ToolCall>),
    /// The model call itself fails
    Fail(String),
}

/// Build a tool call with a generated id.
pub fn call(name: &str, arguments: Value) -> ToolCall {
    static NEXT_ID: AtomicUsize = AtomicUsize::new(1);
    ToolCall {
        id: format!("call_{}", NEXT_ID.fetch_add(1, Ordering::SeqCst)),
        name: name.to_string(),
        arguments,
    }
}

/// Everything the mock model saw.
#[derive(Clone, Default)]
pub struct CallLog {
    histories: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl CallLog {
    pub fn calls(&self) -> usize {
        self.histories.lock().unwrap().len()
    }

    /// Conversation passed on the n-th (0-based) model call
    pub fn history(&self, n: usize) -> Vec<ChatMessage> {
        self.histories.lock().unwrap()[n].clone()
    }
}

/// Mock LLM client replaying a fixed script.
///
/// When the script runs out, the `repeat` step (if any) is returned forever;
/// otherwise the client fails.
pub struct MockLLMClient {
    script: Mutex<VecDeque<Step>>,
    repeat: Option<Step>,
    log: CallLog,
}

impl MockLLMClient {
    pub fn scripted(steps: Vec<Step>) -> (Self, CallLog) {
        let log = CallLog::default();
        let client = Self {
            script: Mutex::new(steps.into()),
            repeat: None,
            log: log.clone(),
        };
        (client, log)
    }

    pub fn repeating(step: Step) -> (Self, CallLog) {
        let (mut client, log) = Self::scripted(vec![]);
        client.repeat = Some(step);
        (client, log)
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<LLMResponse> {
        self.log.histories.lock().unwrap().push(messages.to_vec());

        let next = self.script.lock().unwrap().pop_front();
        let step = next
            .or_else(|| self.repeat.clone())
            .unwrap_or_else(|| Step::Fail("Mock script exhausted".to_string()));

        match step {
            Step::Text(content) => Ok(LLMResponse {
                content,
                tool_calls: vec![],
                finish_reason: "stop".to_string(),
            }),
            Step::Tools(tool_calls) => Ok(LLMResponse {
                content: String::new(),
                tool_calls,
                finish_reason: "tool_calls".to_string(),
            }),
            Step::ToolsWithText(content, tool_calls) => Ok(LLMResponse {
                content,
                tool_calls,
                finish_reason: "tool_calls".to_string(),
            }),
            Step::Fail(message) => Err(AppError::LLM(message)),
        }
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Search provider returning canned hits and counting invocations.
pub struct MockSearchProvider {
    items: Vec<Value>,
    calls: AtomicUsize,
}

impl MockSearchProvider {
    pub fn with_urls(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            items: urls
                .iter()
                .enumerate()
                .map(|(i, url)| {
                    json!({
                        "url": url,
                        "title": format!("Result {}", i + 1),
                        "content": format!("Snippet {}", i + 1),
                        "score": 0.9
                    })
                })
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.iter().take(max_results).cloned().collect())
    }
}


/// Tool that always fails, counting its invocations.
#[derive(Default)]
pub struct FailingTool {
    calls: AtomicUsize,
}

impl FailingTool {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "flaky_lookup"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Tool("lookup backend unavailable".to_string()))
    }
}
