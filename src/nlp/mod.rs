//! Natural language processing orchestration layer.

pub mod classifier;
pub mod forest;
pub mod keywords;
pub mod ner;
pub mod summary;
pub mod tfidf;

use std::sync::Arc;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{dataset, knowledge::DomainKnowledge},
};

use self::{
    classifier::{ClassifierParams, SnippetClassifier},
    keywords::KeywordMatcher,
    ner::{NamedEntities, Ner},
};

/// Everything returned for one analysed snippet.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub dictionary_entities: IndexMap<String, Vec<String>>,
    pub spacy_entities: NamedEntities,
    pub predicted_labels: Vec<String>,
    pub summary: String,
}

/// Process-wide analysis context, built once at startup and read-only after.
pub struct Analyzer {
    keywords: KeywordMatcher,
    ner: Arc<dyn Ner>,
    classifier: SnippetClassifier,
}

impl Analyzer {
    /// Load domain knowledge and the NER model, then fit the classifier on the
    /// configured dataset. Any failure here is fatal to the caller.
    #[instrument(skip(settings))]
    pub fn build(settings: &Settings) -> Result<Self> {
        let knowledge = DomainKnowledge::load(&settings.domain_knowledge_path)?;
        let ner = ner::load_model().context("loading NER model")?;
        let snippets = dataset::load_snippets(&settings.dataset_path)?;
        let classifier = SnippetClassifier::fit(
            &snippets,
            ClassifierParams {
                max_features: settings.tfidf_max_features,
                n_trees: settings.forest_trees,
                seed: settings.random_seed,
            },
        )
        .context("fitting snippet classifier")?;
        let analyzer = Self::from_parts(&knowledge, ner, classifier)?;
        info!(
            categories = analyzer.keywords.category_count(),
            labels = analyzer.classifier.labels().len(),
            "analysis context ready"
        );
        Ok(analyzer)
    }

    pub fn from_parts(
        knowledge: &DomainKnowledge,
        ner: Arc<dyn Ner>,
        classifier: SnippetClassifier,
    ) -> Result<Self> {
        Ok(Self {
            keywords: KeywordMatcher::new(knowledge)?,
            ner,
            classifier,
        })
    }

    pub fn dictionary_lookup(&self, text: &str) -> IndexMap<String, Vec<String>> {
        self.keywords.lookup(text)
    }

    pub fn named_entities(&self, text: &str) -> NamedEntities {
        ner::group(self.ner.extract(text))
    }

    pub fn classify(&self, text: &str) -> Vec<String> {
        self.classifier.classify(text)
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        AnalysisResult {
            dictionary_entities: self.dictionary_lookup(text),
            spacy_entities: self.named_entities(text),
            predicted_labels: self.classify(text),
            summary: summary::summarize(text),
        }
    }
}
