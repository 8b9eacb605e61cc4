//! Dictionary lookup of domain keywords on word boundaries.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;

use crate::data::knowledge::DomainKnowledge;

struct Keyword {
    text: String,
    pattern: Regex,
}

/// Precompiled matcher over a [`DomainKnowledge`] mapping.
pub struct KeywordMatcher {
    categories: Vec<(String, Vec<Keyword>)>,
}

impl KeywordMatcher {
    pub fn new(knowledge: &DomainKnowledge) -> Result<Self> {
        let categories = knowledge
            .categories()
            .map(|(category, keywords)| {
                let compiled = keywords
                    .iter()
                    .map(|keyword| {
                        let pattern = format!(r"\b{}\b", regex::escape(&keyword.to_lowercase()));
                        let pattern = Regex::new(&pattern)
                            .with_context(|| format!("compiling keyword `{keyword}`"))?;
                        Ok(Keyword {
                            text: keyword.clone(),
                            pattern,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok((category.to_string(), compiled))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { categories })
    }

    /// Every keyword found in `text`, grouped by category. Categories without a
    /// hit are left out; keywords are reported as written in the mapping.
    pub fn lookup(&self, text: &str) -> IndexMap<String, Vec<String>> {
        let lower = text.to_lowercase();
        self.categories
            .iter()
            .filter_map(|(category, keywords)| {
                let matched: Vec<String> = keywords
                    .iter()
                    .filter(|k| k.pattern.is_match(&lower))
                    .map(|k| k.text.clone())
                    .collect();
                (!matched.is_empty()).then(|| (category.clone(), matched))
            })
            .collect()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}
