use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower bound for [`ResearchQuery::max_sources`].
pub const MIN_SOURCES: usize = 1;
/// Upper bound for [`ResearchQuery::max_sources`].
pub const MAX_SOURCES: usize = 20;
/// Default number of sources the agent is asked to consult.
pub const DEFAULT_MAX_SOURCES: usize = 5;

// ============= Research Types =============

/// How deep a research session should go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    /// Brief summary from two or three sources
    Quick,
    /// Comprehensive summary from multiple sources
    #[default]
    Standard,
    /// In-depth analysis across many sources
    Comprehensive,
}

impl ResearchDepth {
    /// Lowercase name, as used in prompts and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchDepth::Quick => "quick",
            ResearchDepth::Standard => "standard",
            ResearchDepth::Comprehensive => "comprehensive",
        }
    }

    /// Instruction given to the model for this depth
    pub fn directive(&self) -> &'static str {
        match self {
            ResearchDepth::Quick => {
                "Do a quick search and provide a brief summary from 2-3 sources."
            }
            ResearchDepth::Standard => {
                "Search multiple sources and provide a comprehensive summary."
            }
            ResearchDepth::Comprehensive => {
                "Conduct in-depth research across many sources and provide detailed analysis."
            }
        }
    }
}

impl fmt::Display for ResearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResearchDepth {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(ResearchDepth::Quick),
            "standard" => Ok(ResearchDepth::Standard),
            "comprehensive" => Ok(ResearchDepth::Comprehensive),
            other => Err(AppError::InvalidInput(format!(
                "Unknown research depth '{}': expected quick, standard or comprehensive",
                other
            ))),
        }
    }
}

/// A research request as accepted by the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchQuery {
    pub query: String,
    #[serde(default)]
    pub depth: ResearchDepth,
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
}

fn default_max_sources() -> usize {
    DEFAULT_MAX_SOURCES
}

impl ResearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            depth: ResearchDepth::default(),
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }

    pub fn with_depth(mut self, depth: ResearchDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_max_sources(mut self, max_sources: usize) -> Self {
        self.max_sources = max_sources;
        self
    }

    /// Reject empty queries and source bounds outside `[1, 20]`
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Research query cannot be empty".to_string(),
            ));
        }
        if !(MIN_SOURCES..=MAX_SOURCES).contains(&self.max_sources) {
            return Err(AppError::InvalidInput(format!(
                "max_sources must be between {} and {}, got {}",
                MIN_SOURCES, MAX_SOURCES, self.max_sources
            )));
        }
        Ok(())
    }
}

/// Final artifact of one research session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub query: String,
    /// Markdown summary, ending with the "Sources" section when any were cited
    pub summary: String,
    pub sources_consulted: Vec<String>,
    pub depth: ResearchDepth,
    /// Number of model calls made during the session
    pub iterations: usize,
    pub timestamp: DateTime<Utc>,
}

impl ResearchResult {
    /// Render the result as a standalone markdown document
    pub fn to_markdown(&self) -> String {
        format!(
            "# Research Results\n\n**Query:** {}\n\n**Depth:** {}\n\n**Timestamp:** {}\n\n---\n\n{}",
            self.query,
            self.depth,
            self.timestamp.to_rfc3339(),
            self.summary
        )
    }

    /// Write the markdown rendering to `path`
    pub async fn save_markdown(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        tokio::fs::write(path, self.to_markdown())
            .await
            .map_err(|e| {
                AppError::Internal(format!("Failed to write {}: {}", path.display(), e))
            })?;
        tracing::info!("Research results saved to {}", path.display());
        Ok(())
    }
}

// ============= Adapter Types =============

/// A single normalized search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Provider relevance score, when reported
    pub score: Option<f64>,
}

/// Structured outcome of a search call. Failures are values, not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchOutcome {
    pub fn found(query: &str, results: Vec<SearchResult>) -> Self {
        Self {
            success: true,
            query: Some(query.to_string()),
            count: Some(results.len()),
            results,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            query: None,
            results: vec![],
            count: None,
            error: Some(error.into()),
        }
    }
}

/// Content extracted from one fetched webpage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub title: String,
    /// Main body text, truncated with a trailing "..." when over the cap
    pub content: String,
    pub author: Option<String>,
    /// Free-form date string exactly as found in the page
    pub published_date: Option<String>,
    pub extracted_at: DateTime<Utc>,
    pub success: bool,
    pub error: Option<String>,
}

impl ExtractedPage {
    pub fn failed(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            content: String::new(),
            author: None,
            published_date: None,
            extracted_at: Utc::now(),
            success: false,
            error: Some(error.into()),
        }
    }
}

// ============= Conversation Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One turn of a session's conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Tool invocations requested by an assistant turn
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set on tool turns, pointing back at the originating call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::System, content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::User, content.into())
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: vec![],
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    fn plain(role: MessageRole, content: String) -> Self {
        Self {
            role,
            content,
            tool_calls: vec![],
            tool_call_id: None,
        }
    }
}

// ============= Tool Types =============

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
