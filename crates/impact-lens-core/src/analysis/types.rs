//! Request and result types for the analysis service.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::content::{count_words, ContentPayload};
use crate::i18n::Language;

/// Leading "Vraag:" / "Question:" style label, in any supported language
static QUESTION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:question/vraag|vraag|question|frage|pregunta)\s*:\s*")
        .expect("Invalid QUESTION_LABEL regex")
});

/// Leading "Antwoord:" / "Answer:" style label
static ANSWER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:answer/antwoord|antwoord|answer|antwort|respuesta)\s*:\s*")
        .expect("Invalid ANSWER_LABEL regex")
});

/// Body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub url: String,
    pub title: String,
    pub text: String,
    pub language: Language,
}

impl AnalysisRequest {
    /// Build the request for an extracted payload in the selected language
    pub fn from_payload(payload: &ContentPayload, language: Language) -> Self {
        Self {
            url: payload.url.clone(),
            title: payload.title.clone(),
            text: payload.text.clone(),
            language,
        }
    }

    pub fn word_count(&self) -> usize {
        count_words(&self.text)
    }
}

/// A critical question with its answer, if the analysis found one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalQuestion {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

impl CriticalQuestion {
    /// Parse the service's `"Vraag: ... | Antwoord: ..."` form.
    ///
    /// Text without a `|` separator is a question with no answer.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('|') {
            Some((question, answer)) => Self {
                question: strip_label(&QUESTION_LABEL, question),
                answer: Some(strip_label(&ANSWER_LABEL, answer)).filter(|a| !a.is_empty()),
            },
            None => Self {
                question: strip_label(&QUESTION_LABEL, raw),
                answer: None,
            },
        }
    }
}

fn strip_label(label: &Regex, text: &str) -> String {
    label.replace(text.trim(), "").trim().to_string()
}

/// A source cited by the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// Structured result of an analysis.
///
/// Only the shape is checked; the content is whatever the service produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub claim_summary: Option<String>,
    #[serde(default)]
    pub impact_summary: Vec<String>,
    #[serde(default)]
    pub critical_questions: Vec<CriticalQuestion>,
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Words the service counted (and billed) for this article
    pub word_count: u64,
    /// Service-side completion time, as sent
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A question as it appears on the wire: usually a string, occasionally an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireQuestion {
    Text(String),
    Pair {
        #[serde(alias = "Vraag", alias = "vraag")]
        question: String,
        #[serde(default, alias = "Antwoord", alias = "antwoord")]
        answer: Option<String>,
    },
}

/// JSON body returned by the analysis service
#[derive(Debug, Deserialize)]
pub(crate) struct WireAnalysis {
    #[serde(default)]
    claim_summary: Option<String>,
    #[serde(default)]
    critical_questions: Vec<WireQuestion>,
    #[serde(default)]
    impact_summary: Vec<String>,
    #[serde(default)]
    sources: Vec<Source>,
    word_count: u64,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<WireAnalysis> for AnalysisResult {
    fn from(wire: WireAnalysis) -> Self {
        let critical_questions = wire
            .critical_questions
            .into_iter()
            .map(|q| match q {
                WireQuestion::Text(raw) => CriticalQuestion::parse(&raw),
                WireQuestion::Pair { question, answer } => CriticalQuestion {
                    question: question.trim().to_string(),
                    answer: answer.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()),
                },
            })
            .collect();

        Self {
            claim_summary: wire.claim_summary.filter(|c| !c.trim().is_empty()),
            impact_summary: wire.impact_summary,
            critical_questions,
            sources: wire.sources,
            word_count: wire.word_count,
            timestamp: wire.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_dutch_pair() {
        let q = CriticalQuestion::parse("Vraag: Wie betaalt? | Antwoord: De gemeente.");
        assert_eq!(q.question, "Wie betaalt?");
        assert_eq!(q.answer.as_deref(), Some("De gemeente."));
    }

    #[test]
    fn test_parse_other_languages() {
        let en = CriticalQuestion::parse("Question: Who pays? | Answer: The city");
        assert_eq!(en.question, "Who pays?");
        assert_eq!(en.answer.as_deref(), Some("The city"));

        let de = CriticalQuestion::parse("Frage: Wer zahlt? | Antwort: Die Stadt");
        assert_eq!(de.question, "Wer zahlt?");
        assert_eq!(de.answer.as_deref(), Some("Die Stadt"));
    }

    #[test]
    fn test_parse_without_separator() {
        let q = CriticalQuestion::parse("Is the figure current?");
        assert_eq!(q.question, "Is the figure current?");
        assert_eq!(q.answer, None);
    }

    #[test]
    fn test_parse_empty_answer() {
        let q = CriticalQuestion::parse("Vraag: Waarom? | Antwoord:  ");
        assert_eq!(q.answer, None);
    }

    #[test]
    fn test_wire_analysis_conversion() {
        let json = r#"{
            "claim_summary": "The council raised taxes.",
            "critical_questions": [
                "Vraag: Hoeveel? | Antwoord: 3%",
                {"vraag": "Wanneer?", "antwoord": "In 2027"}
            ],
            "impact_summary": ["Higher bills"],
            "sources": [{"title": "Council", "url": "https://council.example"}],
            "word_count": 412,
            "timestamp": "2026-03-01T10:00:00"
        }"#;
        let wire: WireAnalysis = serde_json::from_str(json).unwrap();
        let result = AnalysisResult::from(wire);

        assert_eq!(result.claim_summary.as_deref(), Some("The council raised taxes."));
        assert_eq!(
            result.critical_questions,
            vec![
                CriticalQuestion {
                    question: "Hoeveel?".to_string(),
                    answer: Some("3%".to_string()),
                },
                CriticalQuestion {
                    question: "Wanneer?".to_string(),
                    answer: Some("In 2027".to_string()),
                },
            ]
        );
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.word_count, 412);
    }

    #[test]
    fn test_wire_analysis_requires_word_count() {
        let json = r#"{"claim_summary": "x", "critical_questions": []}"#;
        assert!(serde_json::from_str::<WireAnalysis>(json).is_err());
    }

    #[test]
    fn test_blank_claim_is_absent() {
        let wire: WireAnalysis =
            serde_json::from_str(r#"{"claim_summary": "  ", "word_count": 60}"#).unwrap();
        assert_eq!(AnalysisResult::from(wire).claim_summary, None);
    }

    #[test]
    fn test_request_serializes_language_tag() {
        let request = AnalysisRequest {
            url: "https://n.example/a".into(),
            title: "A".into(),
            text: "one two".into(),
            language: Language::Spanish,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["language"], "es");
        assert_eq!(request.word_count(), 2);
    }
}
