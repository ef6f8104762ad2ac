//! HTML content extraction
//!
//! Pure functions over a parsed [`Html`] document. Every rule takes the first
//! match in a fixed priority order and never combines candidates.

use scraper::{node::Node, ElementRef, Html, Selector};

/// Default cap on extracted body text, in characters.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 5000;
/// Appended to body text that was cut at the cap.
pub const TRUNCATION_MARKER: &str = "...";
/// Title used when the page provides none.
pub const UNTITLED: &str = "Untitled";

/// Elements whose whole subtree is ignored when reading body text.
const EXCLUDED_ELEMENTS: &[&str] = &["script", "style", "nav", "header", "footer", "aside"];

/// Date metadata probes, in priority order: (attribute, value).
const DATE_META: &[(&str, &str)] = &[
    ("property", "article:published_time"),
    ("name", "publishdate"),
    ("name", "date"),
    ("itemprop", "datePublished"),
];

/// Everything read out of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub published_date: Option<String>,
}

/// Parse `html` and apply all extraction rules.
pub fn extract_page(html: &str, max_chars: usize) -> PageContent {
    let document = Html::parse_document(html);

    PageContent {
        title: extract_title(&document),
        content: truncate(&extract_body_text(&document), max_chars),
        author: extract_author(&document),
        published_date: extract_published_date(&document),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// `<title>`, then the first `<h1>`, then "Untitled"
pub fn extract_title(document: &Html) -> String {
    ["title", "h1"]
        .iter()
        .filter_map(|css| selector(css))
        .find_map(|sel| {
            document
                .select(&sel)
                .next()
                .and_then(|el| non_empty(&element_text(el)))
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn is_excluded(element: &ElementRef<'_>) -> bool {
    EXCLUDED_ELEMENTS.contains(&element.value().name())
}

fn inside_excluded(element: &ElementRef<'_>) -> bool {
    is_excluded(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| is_excluded(&ancestor))
}

fn first_kept<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    document.select(&sel).find(|el| !inside_excluded(el))
}

fn content_classed(document: &Html) -> Option<ElementRef<'_>> {
    let sel = selector("[class]")?;
    document.select(&sel).find(|el| {
        !inside_excluded(el)
            && el
                .value()
                .attr("class")
                .is_some_and(|class| class.to_lowercase().contains("content"))
    })
}

/// Locate the main content region: `main`, `article`, a "content"-classed
/// element, then `body`.
fn content_root(document: &Html) -> Option<ElementRef<'_>> {
    first_kept(document, "main")
        .or_else(|| first_kept(document, "article"))
        .or_else(|| content_classed(document))
        .or_else(|| first_kept(document, "body"))
}

/// Walks the region with an explicit stack; fetched pages can nest arbitrarily deep.
fn collect_lines(root: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Vec<_> = root.children().rev().collect();

    while let Some(node) = pending.pop() {
        match node.value() {
            Node::Text(text) => lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from),
            ),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(node) {
                    if !is_excluded(&child) {
                        pending.extend(node.children().rev());
                    }
                }
            }
            _ => {}
        }
    }

    lines
}

/// Visible text of the content region, one non-empty line per source line
pub fn extract_body_text(document: &Html) -> String {
    let Some(root) = content_root(document) else {
        return String::new();
    };

    collect_lines(root).join("\n")
}

/// Cut `text` to `max_chars` characters, appending the truncation marker
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

/// `<meta name="author">`, then `<span itemprop="author">`
pub fn extract_author(document: &Html) -> Option<String> {
    let from_meta = selector(r#"meta[name="author"]"#).and_then(|sel| {
        document
            .select(&sel)
            .find_map(|el| el.value().attr("content").and_then(non_empty))
    });

    from_meta.or_else(|| {
        let sel = selector(r#"span[itemprop="author"]"#)?;
        document
            .select(&sel)
            .next()
            .and_then(|el| non_empty(&element_text(el)))
    })
}

/// First matching date metadata, then a `<time datetime>` element.
///
/// The value is returned verbatim and is not checked to be a real date.
pub fn extract_published_date(document: &Html) -> Option<String> {
    let from_meta = DATE_META.iter().find_map(|(attr, value)| {
        let sel = selector(&format!(r#"meta[{}="{}"]"#, attr, value))?;
        document
            .select(&sel)
            .find_map(|el| el.value().attr("content").and_then(non_empty))
    });

    from_meta.or_else(|| {
        let sel = selector("time[datetime]")?;
        document
            .select(&sel)
            .find_map(|el| el.value().attr("datetime").and_then(non_empty))
    })
}
