//! Citation tracking for a research session
//!
//! The [`CitationLedger`] numbers every distinct source url in the order it was
//! first seen and renders the "Sources" section appended to summaries.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum snippet length kept on a citation, in characters.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// A source consulted during research.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub title: String,
    pub snippet: Option<String>,
    pub author: Option<String>,
    /// Opaque display string, never parsed
    pub published_date: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl Citation {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: None,
            author: None,
            published_date: None,
            accessed_at: Utc::now(),
        }
    }

    /// Attach a snippet, keeping at most the first 200 characters
    pub fn with_snippet(mut self, snippet: &str) -> Self {
        self.snippet = if snippet.is_empty() {
            None
        } else {
            Some(snippet.chars().take(SNIPPET_MAX_CHARS).collect())
        };
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_published_date(mut self, published_date: Option<String>) -> Self {
        self.published_date = published_date;
        self
    }

    /// Single bibliography line: `[i] Title by Author - url (Accessed: YYYY-MM-DD)`
    pub fn format(&self, index: usize) -> String {
        let mut line = format!("[{}] {}", index, self.title);
        if let Some(author) = &self.author {
            line.push_str(&format!(" by {}", author));
        }
        line.push_str(&format!(
            " - {} (Accessed: {})",
            self.url,
            self.accessed_at.format("%Y-%m-%d")
        ));
        line
    }
}

/// Deduplicating, 1-based index of the sources cited in one session.
#[derive(Debug, Default)]
pub struct CitationLedger {
    citations: Vec<Citation>,
    index_by_url: HashMap<String, usize>,
}

impl CitationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a citation and return its 1-based index.
    ///
    /// Adding a url that is already present returns the existing index and
    /// leaves the first-seen metadata untouched.
    pub fn add(&mut self, citation: Citation) -> usize {
        if let Some(&index) = self.index_by_url.get(&citation.url) {
            return index;
        }

        self.citations.push(citation);
        let index = self.citations.len();
        self.index_by_url
            .insert(self.citations[index - 1].url.clone(), index);
        index
    }

    /// Look up a citation by its 1-based index
    pub fn get(&self, index: usize) -> Option<&Citation> {
        index.checked_sub(1).and_then(|i| self.citations.get(i))
    }

    pub fn count(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    pub fn citations(&self) -> &[Citation] {
        &self.citations
    }

    /// Cited urls in index order
    pub fn urls(&self) -> Vec<String> {
        self.citations.iter().map(|c| c.url.clone()).collect()
    }

    /// Markdown "Sources" section, or an empty string when nothing was cited
    pub fn format_bibliography(&self) -> String {
        if self.citations.is_empty() {
            return String::new();
        }

        let mut lines = vec!["## Sources\n".to_string()];
        lines.extend(
            self.citations
                .iter()
                .enumerate()
                .map(|(i, citation)| citation.format(i + 1)),
        );
        lines.join("\n")
    }

    pub fn clear(&mut self) {
        self.citations.clear();
        self.index_by_url.clear();
    }
}

/// Ledger handle shared between the agent and the fetch tool.
pub type SharedLedger = Arc<Mutex<CitationLedger>>;

/// Anything that can receive sources as they are discovered.
pub trait CitationSink: Send + Sync {
    /// Record a citation, returning its 1-based index
    fn record(&self, citation: Citation) -> usize;
}

impl CitationSink for Mutex<CitationLedger> {
    fn record(&self, citation: Citation) -> usize {
        self.lock().add(citation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(url: &str, title: &str) -> Citation {
        Citation::new(url, title)
    }

    #[test]
    fn test_add_returns_sequential_indices() {
        let mut ledger = CitationLedger::new();
        assert_eq!(ledger.add(citation("https://a.example", "A")), 1);
        assert_eq!(ledger.add(citation("https://b.example", "B")), 2);
        assert_eq!(ledger.count(), 2);
    }

    #[test]
    fn test_duplicate_url_keeps_first_index_and_metadata() {
        let mut ledger = CitationLedger::new();
        let first = ledger.add(citation("https://a.example", "Original"));
        let second = ledger.add(citation("https://a.example", "Replacement"));

        assert_eq!(first, second);
        assert_eq!(ledger.count(), 1);
        assert_eq!(ledger.get(1).unwrap().title, "Original");
    }

    #[test]
    fn test_get_out_of_range() {
        let mut ledger = CitationLedger::new();
        ledger.add(citation("https://a.example", "A"));

        assert!(ledger.get(0).is_none());
        assert!(ledger.get(2).is_none());
        assert_eq!(ledger.get(1).unwrap().url, "https://a.example");
    }

    #[test]
    fn test_empty_bibliography() {
        assert_eq!(CitationLedger::new().format_bibliography(), "");
    }

    #[test]
    fn test_bibliography_order_and_content() {
        let mut ledger = CitationLedger::new();
        ledger.add(citation("https://one.example", "First Source"));
        ledger.add(
            citation("https://two.example", "Second Source")
                .with_author(Some("Jane Doe".to_string())),
        );

        let bibliography = ledger.format_bibliography();
        assert!(bibliography.starts_with("## Sources"));

        let first = bibliography.find("[1] First Source").unwrap();
        let second = bibliography.find("[2] Second Source by Jane Doe").unwrap();
        assert!(first < second);
        assert!(bibliography.contains("https://one.example"));
        assert!(bibliography.contains("https://two.example"));
    }

    #[test]
    fn test_format_omits_missing_author() {
        let line = citation("https://a.example", "Title").format(3);
        assert!(line.starts_with("[3] Title - https://a.example (Accessed: "));
        assert!(!line.contains(" by "));
    }

    #[test]
    fn test_accessed_date_has_no_time_component() {
        let c = citation("https://a.example", "Title");
        let expected = format!("(Accessed: {})", c.accessed_at.format("%Y-%m-%d"));
        assert!(c.format(1).ends_with(&expected));
    }

    #[test]
    fn test_clear_restarts_indices() {
        let mut ledger = CitationLedger::new();
        ledger.add(citation("https://a.example", "A"));
        ledger.add(citation("https://b.example", "B"));
        ledger.clear();

        assert_eq!(ledger.count(), 0);
        assert_eq!(ledger.add(citation("https://b.example", "B")), 1);
    }

    #[test]
    fn test_snippet_is_capped() {
        let long = "x".repeat(500);
        let c = citation("https://a.example", "A").with_snippet(&long);
        assert_eq!(c.snippet.unwrap().chars().count(), SNIPPET_MAX_CHARS);

        let empty = citation("https://a.example", "A").with_snippet("");
        assert!(empty.snippet.is_none());
    }

    #[test]
    fn test_shared_ledger_as_sink() {
        let ledger: SharedLedger = Arc::new(Mutex::new(CitationLedger::new()));
        let sink: Arc<dyn CitationSink> = ledger.clone();

        assert_eq!(sink.record(citation("https://a.example", "A")), 1);
        assert_eq!(sink.record(citation("https://a.example", "A")), 1);
        assert_eq!(ledger.lock().urls(), vec!["https://a.example".to_string()]);
    }
}
