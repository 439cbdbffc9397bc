//! Page content extraction (runs in the page context).

mod document;
mod extractor;

pub use document::{Region, RenderedDocument};
pub use extractor::{
    count_words, normalize_text, ContentExtractor, ContentPayload, ANNOUNCE_MIN_CHARS,
    MAX_TEXT_CHARS,
};
