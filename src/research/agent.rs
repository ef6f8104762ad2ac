use crate::{
    llm::{LLMClient, OpenAIClient},
    research::citation::{CitationLedger, SharedLedger},
    tools::{
        fetch::{FetcherSettings, WebpageFetcher},
        registry::ToolRegistry,
        search::{SearchProvider, TavilyClient, WebSearchTool},
    },
    types::{ChatMessage, ResearchQuery, ResearchResult, Result, ToolCall},
    utils::config::Config,
};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;

/// Upper bound on model calls per research session.
pub const MAX_ITERATIONS: usize = 10;

/// Summary used when the iteration budget runs out with no assistant text.
pub const INCOMPLETE_NOTICE: &str = "Research incomplete due to iteration limit.";

const SYSTEM_PROMPT: &str = r#"You are a professional research assistant. Your role is to:

1. Search for information on topics using web search
2. Fetch and read webpage content from search results
3. Synthesize information from multiple sources
4. Provide well-cited, accurate summaries

When conducting research:
- Use web_search to find relevant sources
- Use fetch_webpage to read the full content of promising sources
- Cite your sources using [1], [2], etc. format
- Cross-reference information across multiple sources
- Present balanced viewpoints when sources disagree
- Organize findings logically

Always be thorough, accurate, and transparent about your sources."#;

/// Research agent that runs a bounded model/tool conversation.
///
/// Each call to [`research`](Self::research) is one session: the citation
/// ledger is cleared on entry, so sources never carry over between calls.
/// Sessions on the same agent must not overlap.
pub struct ResearchAgent {
    llm: Box<dyn LLMClient>,
    tools: ToolRegistry,
    citations: SharedLedger,
}

impl ResearchAgent {
    /// Build an agent with the OpenAI and Tavily backends described by `config`.
    ///
    /// Fails before any network traffic if a required API key is missing.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate_required_keys()?;

        let llm = OpenAIClient::new(
            config.openai_api_key.clone(),
            config.openai_api_base.clone(),
            config.agent_model.clone(),
            config.agent_temperature,
        );

        Self::with_components(
            Box::new(llm),
            Arc::new(TavilyClient::from_config(config)),
            FetcherSettings::from(config),
            config.max_search_results,
        )
    }

    /// Build an agent from explicit parts
    pub fn with_components(
        llm: Box<dyn LLMClient>,
        search_provider: Arc<dyn SearchProvider>,
        fetcher_settings: FetcherSettings,
        max_search_results: usize,
    ) -> Result<Self> {
        let citations: SharedLedger = Arc::new(Mutex::new(CitationLedger::new()));

        let search = WebSearchTool::new(search_provider, max_search_results);
        let fetcher = WebpageFetcher::new(fetcher_settings)?.with_citation_sink(citations.clone());
        let tools = ToolRegistry::for_research(Arc::new(search), Arc::new(fetcher));

        Ok(Self::with_registry(llm, tools, citations))
    }

    /// Build an agent around a prepared tool set.
    ///
    /// `citations` must be the ledger the registry's fetch tool records into,
    /// otherwise results carry no sources.
    pub fn with_registry(
        llm: Box<dyn LLMClient>,
        tools: ToolRegistry,
        citations: SharedLedger,
    ) -> Self {
        Self {
            llm,
            tools,
            citations,
        }
    }

    /// The ledger backing the current (or most recent) session
    pub fn citations(&self) -> SharedLedger {
        self.citations.clone()
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Research `query` and return a cited summary.
    ///
    /// Only an invalid query is an error. Model failures and an exhausted
    /// iteration budget still produce a result, with the problem described in
    /// its summary.
    pub async fn research(&self, query: ResearchQuery) -> Result<ResearchResult> {
        query.validate()?;

        tracing::info!("Starting research on: {}", query.query);
        self.citations.lock().clear();

        let mut history = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(research_prompt(&query)),
        ];
        let tool_definitions = self.tools.definitions();
        let mut last_text: Option<String> = None;

        for iteration in 1..=MAX_ITERATIONS {
            tracing::info!("Agent iteration {}/{}", iteration, MAX_ITERATIONS);

            let response = match self.llm.chat(&history, &tool_definitions).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!("Research failed: {}", e);
                    return Ok(self.finish(&query, format!("Research failed: {}", e), iteration));
                }
            };

            if !response.wants_tools() {
                tracing::info!("Research complete");
                return Ok(self.finish(&query, response.content, iteration));
            }

            if !response.content.trim().is_empty() {
                last_text = Some(response.content.clone());
            }
            history.push(ChatMessage::assistant(
                response.content,
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let result = self.execute_tool_call(call).await;
                history.push(ChatMessage::tool(call.id.clone(), result.to_string()));
            }
        }

        tracing::warn!("Max iterations reached");
        let summary = last_text.unwrap_or_else(|| INCOMPLETE_NOTICE.to_string());
        Ok(self.finish(&query, summary, MAX_ITERATIONS))
    }

    /// Run one requested tool. Unknown names and failures become an
    /// `{"error": ..}` payload for the model.
    async fn execute_tool_call(&self, call: &ToolCall) -> Value {
        tracing::info!("Executing tool: {}", call.name);
        tracing::debug!("Arguments: {}", call.arguments);

        if !self.tools.has_tool(&call.name) {
            tracing::warn!("Model requested unknown tool: {}", call.name);
            return json!({ "error": format!("Unknown tool: {}", call.name) });
        }

        match self.tools.execute(&call.name, call.arguments.clone()).await {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Tool execution failed: {}", e);
                json!({ "error": e.to_string() })
            }
        }
    }

    /// Assemble the result; sources come from the ledger, in citation order.
    fn finish(&self, query: &ResearchQuery, text: String, iterations: usize) -> ResearchResult {
        let ledger = self.citations.lock();
        let bibliography = ledger.format_bibliography();

        let summary = if bibliography.is_empty() {
            text
        } else {
            format!("{}\n\n{}", text, bibliography)
        };

        ResearchResult {
            query: query.query.clone(),
            summary,
            sources_consulted: ledger.urls(),
            depth: query.depth,
            iterations,
            timestamp: Utc::now(),
        }
    }
}

fn research_prompt(query: &ResearchQuery) -> String {
    format!(
        r#"Research the following topic: {}

Research depth: {}
{}
Consult at most {} sources.

Please:
1. Search for relevant information using web_search
2. Read the most relevant sources using fetch_webpage
3. Synthesize the information into a clear, well-organized summary
4. Cite all sources using [1], [2], etc. format
5. Provide a sources section at the end

Begin your research now."#,
        query.query,
        query.depth,
        query.depth.directive(),
        query.max_sources
    )
}
