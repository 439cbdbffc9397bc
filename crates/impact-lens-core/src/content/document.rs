//! Snapshot of a rendered page as seen by the page script.

use serde::{Deserialize, Serialize};

/// Rendered text of one element matched by a CSS selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Selector the element was found by (e.g. `article`, `.post-content`)
    pub selector: String,
    /// Its rendered text (`innerText`), chrome elements already removed
    pub text: String,
}

/// A rendered document, reduced to what extraction needs.
///
/// The browser side produces this from the live DOM; the CLI builds one from
/// a plain-text file or a JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub url: String,
    pub title: String,
    /// Elements found for the selectors the page script probed, in document order
    #[serde(default)]
    pub regions: Vec<Region>,
    /// Rendered text of `<body>`
    #[serde(default)]
    pub body_text: String,
}

impl RenderedDocument {
    /// Document with only body text, no recognised regions
    pub fn from_text(
        url: impl Into<String>,
        title: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            regions: Vec::new(),
            body_text: body_text.into(),
        }
    }

    /// Add a region (builder style)
    pub fn with_region(mut self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        self.regions.push(Region {
            selector: selector.into(),
            text: text.into(),
        });
        self
    }

    /// First region matched by `selector`
    pub fn query(&self, selector: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.selector == selector)
    }
}
