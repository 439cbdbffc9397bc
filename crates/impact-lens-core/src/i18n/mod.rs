//! Supported languages and panel strings.

mod strings;

use serde::{Deserialize, Serialize};

pub use strings::Strings;

/// Language used both for the analysis request and the panel UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Language {
    #[default]
    Dutch,
    English,
    German,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Dutch,
        Language::English,
        Language::German,
        Language::Spanish,
    ];

    /// Parse a language tag; anything unrecognised falls back to Dutch
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Language::English,
            "de" => Language::German,
            "es" => Language::Spanish,
            "nl" => Language::Dutch,
            other => {
                tracing::debug!("Unknown language tag {:?}, using default", other);
                Language::default()
            }
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Language::Dutch => "nl",
            Language::English => "en",
            Language::German => "de",
            Language::Spanish => "es",
        }
    }

    /// Panel strings for this language
    pub fn strings(&self) -> &'static Strings {
        strings::for_language(*self)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::from_tag(&tag)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.tag().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_known() {
        assert_eq!(Language::from_tag("en"), Language::English);
        assert_eq!(Language::from_tag(" DE "), Language::German);
        assert_eq!(Language::from_tag("es"), Language::Spanish);
        assert_eq!(Language::from_tag("nl"), Language::Dutch);
    }

    #[test]
    fn test_from_tag_fails_closed() {
        assert_eq!(Language::from_tag("fr"), Language::Dutch);
        assert_eq!(Language::from_tag(""), Language::Dutch);
    }

    #[test]
    fn test_tag_roundtrip() {
        for language in Language::ALL {
            assert_eq!(Language::from_tag(language.tag()), language);
        }
    }

    #[test]
    fn test_serde_as_tag() {
        assert_eq!(serde_json::to_string(&Language::German).unwrap(), "\"de\"");
        let parsed: Language = serde_json::from_str("\"xx\"").unwrap();
        assert_eq!(parsed, Language::Dutch);
    }
}
