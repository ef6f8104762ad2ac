//! Research Tools
//!
//! The two capabilities offered to the model during a research session.
//!
//! # Module Structure
//!
//! - [`search`](crate::tools::search) - `web_search`, backed by the Tavily API
//! - [`fetch`](crate::tools::fetch) - `fetch_webpage`, HTTP download plus extraction
//! - [`extract`](crate::tools::extract) - HTML title/body/author/date rules
//! - [`registry`](crate::tools::registry) - Tool trait and name-based dispatch
//!
//! # Tool Registry
//!
//! ```ignore
//! let registry = ToolRegistry::for_research(search, fetcher);
//! let definitions = registry.definitions();  // Schemas offered to the model
//! let page = registry.execute("fetch_webpage", json!({"url": "https://example.com"})).await?;
//! ```
//!
//! Both tools report failures inside their JSON payload (`"success": false`)
//! so the model can react to them.

/// HTML content extraction rules.
pub mod extract;
/// Webpage fetch tool.
pub mod fetch;
/// Tool registry for managing available tools.
pub mod registry;
/// Web search tool using Tavily.
pub mod search;

pub use registry::{Tool, ToolRegistry};
