//! Heuristic article-text extraction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::RenderedDocument;

/// Maximum characters sent for analysis (~2000+ words)
pub const MAX_TEXT_CHARS: usize = 15_000;

/// Pages announce themselves only when the article text is longer than this
pub const ANNOUNCE_MIN_CHARS: usize = 500;

/// Main-content selectors, probed in priority order
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "[role=\"main\"]",
    "main",
    ".content",
    ".article-body",
    ".post-content",
    ".entry-content",
];

/// Selectors that mark a page as a news article
const NEWS_SELECTORS: &[&str] = &["article", ".article", ".news-article", ".post", ".story"];

/// Cleaned text of a page, produced once per extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub url: String,
    pub title: String,
    /// Whitespace-normalised text, at most [`MAX_TEXT_CHARS`] characters
    pub text: String,
    pub word_count: usize,
    pub extracted_at: DateTime<Utc>,
}

impl ContentPayload {
    /// Length of `text` in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Collapse whitespace runs to single spaces and cap the length
pub fn normalize_text(raw: &str, max_chars: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => collapsed[..cut].trim_end().to_string(),
        None => collapsed,
    }
}

/// Picks the main content region of a document and cleans it up
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    content_selectors: Vec<String>,
    news_selectors: Vec<String>,
    max_chars: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self {
            content_selectors: CONTENT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            news_selectors: NEWS_SELECTORS.iter().map(|s| s.to_string()).collect(),
            max_chars: MAX_TEXT_CHARS,
        }
    }
}

impl ContentExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the main-content selector list (sites differ per platform)
    pub fn with_content_selectors(mut self, selectors: Vec<String>) -> Self {
        self.content_selectors = selectors;
        self
    }

    /// Every selector the page script should probe
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.content_selectors
            .iter()
            .chain(self.news_selectors.iter())
            .map(String::as_str)
    }

    /// Extract the article text from `document`.
    ///
    /// The first content selector with non-empty text wins; otherwise the
    /// body text is used.
    pub fn extract(&self, document: &RenderedDocument, at: DateTime<Utc>) -> ContentPayload {
        let main = self
            .content_selectors
            .iter()
            .filter_map(|selector| document.query(selector))
            .map(|region| region.text.as_str())
            .find(|text| !text.trim().is_empty());

        let source = match main {
            Some(text) => text,
            None => {
                tracing::debug!("No main content region on {}, using body", document.url);
                document.body_text.as_str()
            }
        };

        let text = normalize_text(source, self.max_chars);
        let word_count = count_words(&text);
        tracing::debug!(
            "Content extracted: {} chars, {} words",
            text.chars().count(),
            word_count
        );

        ContentPayload {
            url: document.url.clone(),
            title: document.title.clone(),
            text,
            word_count,
            extracted_at: at,
        }
    }

    /// Whether the document looks like a news article
    pub fn is_article(&self, document: &RenderedDocument) -> bool {
        self.news_selectors
            .iter()
            .any(|selector| document.query(selector).is_some())
    }

    /// Whether an extracted payload is substantial enough to announce
    pub fn is_announceable(&self, payload: &ContentPayload) -> bool {
        payload.char_len() > ANNOUNCE_MIN_CHARS
    }
}
