//! Research Orchestration
//!
//! This module drives a single research session end to end:
//! - [`agent::ResearchAgent`] - Runs the bounded model/tool conversation
//! - [`citation::CitationLedger`] - Deduplicates and numbers the sources read
//!
//! # Usage
//!
//! ```ignore
//! use research_assistant::research::ResearchAgent;
//! use research_assistant::types::{ResearchDepth, ResearchQuery};
//!
//! let agent = ResearchAgent::new(&config)?;
//!
//! let result = agent
//!     .research(ResearchQuery::new("vector databases for RAG").with_depth(ResearchDepth::Quick))
//!     .await?;
//!
//! println!("{}", result.summary);
//! for url in &result.sources_consulted {
//!     println!("- {}", url);
//! }
//! ```
//!
//! # Research Workflow
//!
//! 1. **Prompting** - Embed the query, depth directive and source bound
//! 2. **Tool Loop** - Let the model call `web_search` / `fetch_webpage`, up to 10 rounds
//! 3. **Citation** - Every successful page fetch is registered in the ledger
//! 4. **Assembly** - Append the ledger's bibliography to the model's final text

/// Bounded model/tool conversation loop.
pub mod agent;
/// Citation ledger and bibliography formatting.
pub mod citation;

pub use agent::{ResearchAgent, INCOMPLETE_NOTICE, MAX_ITERATIONS};
pub use citation::{Citation, CitationLedger, CitationSink, SharedLedger};
