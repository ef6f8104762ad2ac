//! Web search tool backed by the Tavily API
//!
//! [`WebSearchTool`] normalizes provider output into [`SearchResult`]s and
//! reports every failure as a [`SearchOutcome`] value rather than an error.

use crate::tools::registry::Tool;
use crate::types::{AppError, Result, SearchOutcome, SearchResult};
use crate::utils::config::Config;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Hard bounds on the number of results requested from the provider.
pub const MIN_RESULTS: usize = 1;
pub const MAX_RESULTS: usize = 10;

/// External search backend.
///
/// Returns the provider's raw result items in ranking order.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Value>>;
}

/// Tavily search API client
pub struct TavilyClient {
    http_client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl TavilyClient {
    pub fn new(api_key: String, api_base: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.tavily_api_key.clone(), config.tavily_api_base.clone())
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Value>> {
        let body = json!({
            "api_key": self.api_key,
            "query": query,
            "max_results": max_results,
            "search_depth": "basic",
            "include_answer": false
        });

        let response = self
            .http_client
            .post(format!("{}/search", self.api_base))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Http(format!(
                "Tavily search failed ({}): {}",
                status, text
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AppError::Http(format!("Malformed Tavily response: {}", e)))?;

        Ok(json
            .get("results")
            .and_then(|r| r.as_array())
            .cloned()
            .unwrap_or_default())
    }
}

/// The `web_search` tool
pub struct WebSearchTool {
    provider: Arc<dyn SearchProvider>,
    default_max_results: usize,
}

impl WebSearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, default_max_results: usize) -> Self {
        Self {
            provider,
            default_max_results,
        }
    }

    /// Search for `query`, returning at most `max_results` hits (clamped to 1..=10)
    pub async fn search(&self, query: &str, max_results: Option<usize>) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::failed("Query cannot be empty");
        }

        let max_results = max_results
            .unwrap_or(self.default_max_results)
            .clamp(MIN_RESULTS, MAX_RESULTS);

        tracing::info!("Executing web search for: {}", query);

        match self.provider.search(query, max_results).await {
            Ok(items) => {
                let results: Vec<SearchResult> = items.iter().map(normalize_item).collect();
                tracing::info!("Found {} results", results.len());
                SearchOutcome::found(query, results)
            }
            Err(e) => {
                tracing::error!("Web search failed: {}", e);
                SearchOutcome::failed(e.to_string())
            }
        }
    }
}

/// Any JSON number, clamped to `MIN_RESULTS..=MAX_RESULTS`
fn requested_count(value: &Value) -> Option<usize> {
    let n = value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))?;
    Some(n.clamp(MIN_RESULTS as i64, MAX_RESULTS as i64) as usize)
}

fn normalize_item(item: &Value) -> SearchResult {
    let text = |key: &str| {
        item.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string()
    };

    SearchResult {
        url: text("url"),
        title: text("title"),
        snippet: text("content"),
        score: item.get("score").and_then(|v| v.as_f64()),
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information on a given query. Returns a list of relevant \
         web pages with titles, URLs, and snippets."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to execute"
                },
                "max_results": {
                    "type": "integer",
                    "description": format!(
                        "Maximum number of results to return (default: {}, min: {}, max: {})",
                        self.default_max_results.clamp(MIN_RESULTS, MAX_RESULTS),
                        MIN_RESULTS,
                        MAX_RESULTS
                    ),
                    "minimum": MIN_RESULTS,
                    "maximum": MAX_RESULTS
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value> {
        let query = args.get("query").and_then(|v| v.as_str()).unwrap_or("");
        let max_results = args.get("max_results").and_then(requested_count);

        let outcome = self.search(query, max_results).await;
        Ok(serde_json::to_value(outcome)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records calls and replays a canned result
    struct StubProvider {
        calls: AtomicUsize,
        last_max: AtomicUsize,
        reply: std::result::Result<Vec<Value>, String>,
    }

    impl StubProvider {
        fn ok(items: Vec<Value>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_max: AtomicUsize::new(0),
                reply: Ok(items),
            })
        }

        fn err(message: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_max: AtomicUsize::new(0),
                reply: Err(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl SearchProvider for StubProvider {
        async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<Value>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_max.store(max_results, Ordering::SeqCst);
            self.reply.clone().map_err(AppError::Http)
        }
    }

    #[tokio::test]
    async fn test_blank_query_skips_provider() {
        let provider = StubProvider::ok(vec![]);
        let tool = WebSearchTool::new(provider.clone(), 5);

        for query in ["", "   \t"] {
            let outcome = tool.search(query, None).await;
            assert!(!outcome.success);
            assert!(outcome.results.is_empty());
            assert_eq!(outcome.error.as_deref(), Some("Query cannot be empty"));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_are_normalized_in_order() {
        let provider = StubProvider::ok(vec![
            json!({"url": "https://a.example", "title": "A", "content": "alpha", "score": 0.9}),
            json!({"title": "No url"}),
        ]);
        let tool = WebSearchTool::new(provider, 5);

        let outcome = tool.search("rust", None).await;
        assert!(outcome.success);
        assert_eq!(outcome.count, Some(2));
        assert_eq!(outcome.results[0].url, "https://a.example");
        assert_eq!(outcome.results[0].score, Some(0.9));
        assert_eq!(outcome.results[1].url, "");
        assert_eq!(outcome.results[1].snippet, "");
        assert_eq!(outcome.results[1].score, None);
    }

    #[tokio::test]
    async fn test_max_results_is_clamped() {
        let provider = StubProvider::ok(vec![]);
        let tool = WebSearchTool::new(provider.clone(), 5);

        tool.search("q", Some(50)).await;
        assert_eq!(provider.last_max.load(Ordering::SeqCst), MAX_RESULTS);

        tool.search("q", Some(0)).await;
        assert_eq!(provider.last_max.load(Ordering::SeqCst), MIN_RESULTS);

        tool.search("q", None).await;
        assert_eq!(provider.last_max.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_execute_clamps_signed_and_float_counts() {
        let provider = StubProvider::ok(vec![]);
        let tool = WebSearchTool::new(provider.clone(), 5);

        for (raw, expected) in [(json!(-3), 1), (json!(3.0), 3), (json!(7), 7), (json!(1e9), 10)] {
            tool.execute(json!({ "query": "q", "max_results": raw })).await.unwrap();
            assert_eq!(provider.last_max.load(Ordering::SeqCst), expected, "{}", raw);
        }

        tool.execute(json!({ "query": "q", "max_results": "many" })).await.unwrap();
        assert_eq!(provider.last_max.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_provider_error_becomes_outcome() {
        let tool = WebSearchTool::new(StubProvider::err("connection refused"), 5);

        let outcome = tool.search("rust", None).await;
        assert!(!outcome.success);
        assert!(outcome.results.is_empty());
        assert!(outcome.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_execute_with_missing_query_is_structured_failure() {
        let tool = WebSearchTool::new(StubProvider::ok(vec![]), 5);

        let value = tool.execute(json!({})).await.unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["results"], json!([]));
    }

    #[test]
    fn test_search_tool_definition() {
        let tool = WebSearchTool::new(StubProvider::ok(vec![]), 5);
        assert_eq!(tool.name(), "web_search");
        assert!(!tool.description().is_empty());

        let schema = tool.parameters_schema();
        assert!(schema["properties"]["query"].is_object());
        assert_eq!(schema["required"], json!(["query"]));
    }

    #[test]
    fn test_schema_reports_configured_default() {
        let tool = WebSearchTool::new(StubProvider::ok(vec![]), 8);
        let schema = tool.parameters_schema();
        let description = schema["properties"]["max_results"]["description"]
            .as_str()
            .unwrap();
        assert!(description.contains("default: 8"));
    }

    #[tokio::test]
    async fn test_tavily_request_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_partial_json(json!({
                "api_key": "tvly-test",
                "query": "vector databases",
                "max_results": 3,
                "search_depth": "basic",
                "include_answer": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"url": "https://a.example", "title": "A", "content": "alpha", "score": 0.5}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TavilyClient::new("tvly-test".to_string(), server.uri());
        let items = client.search("vector databases", 3).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["url"], "https://a.example");
    }

    #[tokio::test]
    async fn test_tavily_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let tool = WebSearchTool::new(
            Arc::new(TavilyClient::new("tvly-test".to_string(), server.uri())),
            5,
        );
        let outcome = tool.search("rust", None).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("Malformed"));
    }
}
