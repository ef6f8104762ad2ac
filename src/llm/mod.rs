//! LLM Provider Clients and Abstractions
//!
//! The research agent talks to its model through the [`LLMClient`] trait, so
//! the conversation loop never depends on a concrete provider.
//!
//! # Example
//!
//! ```ignore
//! use research_assistant::llm::{LLMClient, OpenAIClient};
//! use research_assistant::types::ChatMessage;
//!
//! let client = OpenAIClient::new(api_key, api_base, "gpt-4o-mini".to_string(), 0.3);
//! let response = client.chat(&[ChatMessage::user("What is 2+2?")], &[]).await?;
//! println!("{}", response.content);
//! ```

/// Core LLM client trait and response type.
pub mod client;
/// OpenAI-compatible chat completions client.
pub mod openai;

pub use client::{LLMClient, LLMResponse};
pub use openai::OpenAIClient;
