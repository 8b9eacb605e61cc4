//! Named-entity recognition. A rule and gazetteer recogniser is the default;
//! the `bert-ner` feature swaps in a pretrained rust-bert token classifier.

use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Extracted entity span with byte offsets relative to the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
    pub score: f64,
}

/// Trait for NER implementations.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Vec<Span>;
}

/// The three entity groups reported to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedEntities {
    pub persons: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
}

/// Bucket spans by label, dropping anything that is not a person,
/// organisation or geopolitical place.
pub fn group(spans: Vec<Span>) -> NamedEntities {
    let mut entities = NamedEntities::default();
    for span in spans {
        match span.label.as_str() {
            "PERSON" => entities.persons.push(span.text),
            "ORG" => entities.organizations.push(span.text),
            "GPE" => entities.locations.push(span.text),
            _ => {}
        }
    }
    entities
}

static CAPITALISED_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][\w&'-]*(?:\s+(?:of\s+)?[A-Z][\w&'-]*)*").expect("valid regex")
});

const HONORIFICS: &[&str] = &["Mr", "Mrs", "Ms", "Dr", "Prof", "Sir"];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Anna", "Ben", "Carlos", "Chen", "David", "Elena", "Emily", "James", "John", "Maria",
    "Michael", "Mohammed", "Olivia", "Priya", "Raj", "Sarah", "Sophie", "Tom", "Wei",
];

const ORG_SUFFIXES: &[&str] = &[
    "Inc", "Corp", "Corporation", "Ltd", "LLC", "GmbH", "Group", "Labs", "Bank", "Systems",
    "Technologies", "University",
];

const ORG_NAMES: &[&str] = &[
    "Amazon", "Apple", "Google", "IBM", "Microsoft", "Oracle", "Salesforce", "SAP", "Snowflake",
];

const PLACES: &[&str] = &[
    "Australia", "Berlin", "Brazil", "California", "Canada", "China", "EU", "Europe", "France",
    "Germany", "India", "Japan", "London", "New York", "Paris", "San Francisco", "Singapore",
    "Texas", "UK", "US", "USA", "United Kingdom", "United States",
];

/// Rule-based fallback: capitalised token runs classified by honorifics,
/// first names, organisation suffixes and a small place gazetteer.
#[derive(Debug, Default)]
pub struct RuleNer;

impl RuleNer {
    fn classify(&self, text: &str, run: &str, start: usize) -> Option<&'static str> {
        let words: Vec<&str> = run.split_whitespace().collect();
        let first = words.first()?;
        let last = words.last()?;

        if PLACES.contains(&run) {
            return Some("GPE");
        }
        if ORG_NAMES.contains(&run)
            || ORG_SUFFIXES.contains(last)
            || (run.starts_with("Competitor") && run.len() > "Competitor".len())
        {
            return Some("ORG");
        }
        let preceding = text[..start]
            .trim_end()
            .trim_end_matches('.')
            .split_whitespace()
            .last()
            .unwrap_or_default();
        let after_honorific = HONORIFICS.contains(&preceding);
        if after_honorific || FIRST_NAMES.contains(first) {
            return Some("PERSON");
        }
        None
    }
}

impl Ner for RuleNer {
    fn extract(&self, text: &str) -> Vec<Span> {
        CAPITALISED_RUN
            .find_iter(text)
            .filter(|m| !HONORIFICS.contains(&m.as_str()))
            .filter_map(|m| {
                let label = self.classify(text, m.as_str(), m.start())?;
                Some(Span {
                    start: m.start(),
                    end: m.end(),
                    label: label.to_string(),
                    text: m.as_str().to_string(),
                    score: 0.6,
                })
            })
            .collect()
    }
}

#[cfg(feature = "bert-ner")]
mod bert {
    use std::sync::Mutex;

    use anyhow::Result;
    use rust_bert::pipelines::{ner::NERModel, token_classification::TokenClassificationConfig};

    use super::{Ner, Span};

    /// Pretrained transformer NER; the model is not `Sync`, so calls are serialised.
    pub struct BertNer {
        model: Mutex<NERModel>,
    }

    impl BertNer {
        pub fn load() -> Result<Self> {
            let model = NERModel::new(TokenClassificationConfig::default())?;
            Ok(Self {
                model: Mutex::new(model),
            })
        }
    }

    impl Ner for BertNer {
        fn extract(&self, text: &str) -> Vec<Span> {
            // Poisoned only if an earlier prediction panicked.
            let model = self.model.lock().expect("ner model lock poisoned");
            model
                .predict_full_entities(&[text])
                .into_iter()
                .flatten()
                .filter_map(|entity| {
                    let label = match entity.label.trim_start_matches("I-").trim_start_matches("B-") {
                        "PER" => "PERSON",
                        "ORG" => "ORG",
                        "LOC" => "GPE",
                        _ => return None,
                    };
                    let start = entity.offset.begin as usize;
                    let end = entity.offset.end as usize;
                    Some(Span {
                        start,
                        end,
                        label: label.to_string(),
                        text: entity.word,
                        score: entity.score,
                    })
                })
                .collect()
        }
    }
}

/// Load the configured recogniser. Blocks while a pretrained model is fetched.
pub fn load_model() -> Result<Arc<dyn Ner>> {
    #[cfg(feature = "bert-ner")]
    {
        Ok(Arc::new(bert::BertNer::load()?) as Arc<dyn Ner>)
    }
    #[cfg(not(feature = "bert-ner"))]
    {
        Ok(Arc::new(RuleNer) as Arc<dyn Ner>)
    }
}
