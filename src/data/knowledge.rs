//! Category to keyword mapping loaded once at startup.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

/// `category -> keywords` mapping, kept in file order. Only the shape is
/// checked: every value must be a list of strings, possibly empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DomainKnowledge {
    categories: IndexMap<String, Vec<String>>,
}

impl DomainKnowledge {
    /// Read the JSON mapping at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading domain knowledge {}", path.display()))?;
        let knowledge = Self::from_json(&raw)
            .with_context(|| format!("parsing domain knowledge {}", path.display()))?;
        info!(
            path = %path.display(),
            categories = knowledge.categories.len(),
            "loaded domain knowledge"
        );
        Ok(knowledge)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_pairs<I, C, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, Vec<K>)>,
        C: Into<String>,
        K: Into<String>,
    {
        let categories = pairs
            .into_iter()
            .map(|(c, ks)| (c.into(), ks.into_iter().map(Into::into).collect()))
            .collect();
        Self { categories }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(c, ks)| (c.as_str(), ks.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
