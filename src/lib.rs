//! # Research Assistant
//!
//! An LLM research agent that searches the web, reads the most promising pages
//! and answers with a cited markdown summary.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use research_assistant::{Config, ResearchAgent};
//! use research_assistant::types::{ResearchDepth, ResearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     research_assistant::utils::logging::init_tracing(false);
//!
//!     // Requires OPENAI_API_KEY and TAVILY_API_KEY
//!     let config = Config::from_env()?;
//!     let agent = ResearchAgent::new(&config)?;
//!
//!     let query = ResearchQuery::new("vector databases for RAG applications")
//!         .with_depth(ResearchDepth::Standard)
//!         .with_max_sources(5);
//!     let result = agent.research(query).await?;
//!
//!     println!("{}", result.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`research`] - Research agent loop and citation ledger
//! - [`tools`] - `web_search` and `fetch_webpage` tools
//! - [`llm`] - LLM client trait and OpenAI implementation
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and logging setup

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// LLM provider clients and abstractions.
pub mod llm;
/// Research orchestration and citation tracking.
pub mod research;
/// Research tools (web search, page fetch).
pub mod tools;
/// Core types (research data model, conversation, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use llm::{LLMClient, LLMResponse};
pub use research::{Citation, CitationLedger, ResearchAgent};
pub use tools::registry::ToolRegistry;
pub use types::{AppError, Result};
pub use utils::config::Config;
