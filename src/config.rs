//! Runtime configuration utilities for call-insights.

use std::{env, path::PathBuf, str::FromStr};

use serde::Deserialize;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Snippet table produced by `generate` and fitted on at startup.
    pub dataset_path: PathBuf,
    /// JSON object mapping category name to keyword list.
    pub domain_knowledge_path: PathBuf,
    /// Trees grown per label forest.
    pub forest_trees: usize,
    /// Seed for bootstrap and feature sampling in the classifier.
    pub random_seed: u64,
    /// Upper bound on the TF-IDF vocabulary.
    pub tfidf_max_features: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("calls_dataset.csv"),
            domain_knowledge_path: PathBuf::from("domain_knowledge.json"),
            forest_trees: 100,
            random_seed: 42,
            tfidf_max_features: 5000,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let dataset_path = env::var("CALLS_DATASET")
            .map(PathBuf::from)
            .unwrap_or(defaults.dataset_path);
        let domain_knowledge_path = env::var("DOMAIN_KNOWLEDGE")
            .map(PathBuf::from)
            .unwrap_or(defaults.domain_knowledge_path);

        Ok(Self {
            dataset_path,
            domain_knowledge_path,
            forest_trees: parsed_var("FOREST_TREES").unwrap_or(defaults.forest_trees),
            random_seed: parsed_var("RANDOM_SEED").unwrap_or(defaults.random_seed),
            tfidf_max_features: parsed_var("TFIDF_MAX_FEATURES")
                .unwrap_or(defaults.tfidf_max_features),
        })
    }
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
