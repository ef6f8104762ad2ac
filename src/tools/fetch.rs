//! Webpage fetching tool
//!
//! Downloads a page, runs the [`extract`](crate::tools::extract) rules over it
//! and, when a citation sink is attached, registers every successful fetch as
//! a source.

use crate::research::citation::{Citation, CitationSink};
use crate::tools::extract::{self, DEFAULT_MAX_CONTENT_CHARS};
use crate::tools::registry::Tool;
use crate::types::{ExtractedPage, Result};
use crate::utils::config::{Config, USER_AGENT};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// HTTP settings for [`WebpageFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_content_chars: usize,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl From<&Config> for FetcherSettings {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.request_timeout(),
            user_agent: config.user_agent.clone(),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

enum FetchError {
    Timeout,
    Status(u16),
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Other(err.to_string())
        }
    }
}

impl FetchError {
    fn message(&self) -> String {
        match self {
            FetchError::Timeout => "Request timeout".to_string(),
            FetchError::Status(code) => format!("HTTP {}", code),
            FetchError::Other(msg) => msg.clone(),
        }
    }
}

/// The `fetch_webpage` tool
pub struct WebpageFetcher {
    http_client: reqwest::Client,
    max_content_chars: usize,
    citation_sink: Option<Arc<dyn CitationSink>>,
}

impl WebpageFetcher {
    pub fn new(settings: FetcherSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            http_client,
            max_content_chars: settings.max_content_chars,
            citation_sink: None,
        })
    }

    /// Register every successful fetch with `sink`
    pub fn with_citation_sink(mut self, sink: Arc<dyn CitationSink>) -> Self {
        self.citation_sink = Some(sink);
        self
    }

    /// Fetch `url` and extract its content. Failures are reported in the
    /// returned page, never as an error.
    pub async fn fetch(&self, url: &str) -> ExtractedPage {
        let url = url.trim();
        if url.is_empty() {
            return ExtractedPage::failed(url, "URL cannot be empty");
        }

        tracing::info!("Fetching webpage: {}", url);

        let html = match self.download(url).await {
            Ok(html) => html,
            Err(e) => {
                let message = e.message();
                tracing::error!("Error fetching {}: {}", url, message);
                return ExtractedPage::failed(url, message);
            }
        };

        let content = extract::extract_page(&html, self.max_content_chars);
        tracing::info!("Successfully extracted content from {}", url);

        if let Some(sink) = &self.citation_sink {
            let citation = Citation::new(url, content.title.clone())
                .with_snippet(&content.content)
                .with_author(content.author.clone())
                .with_published_date(content.published_date.clone());
            let index = sink.record(citation);
            tracing::debug!("Registered {} as citation [{}]", url, index);
        }

        ExtractedPage {
            url: url.to_string(),
            title: content.title,
            content: content.content,
            author: content.author,
            published_date: content.published_date,
            extracted_at: Utc::now(),
            success: true,
            error: None,
        }
    }

    async fn download(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Tool for WebpageFetcher {
    fn name(&self) -> &str {
        "fetch_webpage"
    }

    fn description(&self) -> &str {
        "Fetch and extract the main content from a webpage. Retrieves the page and \
         returns its title and main text, with navigation, scripts, and other \
         non-content elements removed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the webpage to fetch"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let url = args.get("url").and_then(|v| v.as_str()).unwrap_or("");
        let page = self.fetch(url).await;
        Ok(serde_json::to_value(page)?)
    }
}
