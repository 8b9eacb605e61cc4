//! Synthetic call snippet table used to train the label classifier.

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use rand::Rng;
use tracing::info;

/// Number of rows written by [`generate`].
pub const ROW_COUNT: usize = 120;

/// Hand-written call transcript snippets.
pub const TEMPLATES: [&str; 15] = [
    "We love the analytics, but CompetitorX has a cheaper subscription.",
    "Our compliance team is worried about data handling. Are you SOC2 certified?",
    "Do you offer any discounts for enterprise customers?",
    "I am concerned about data security and GDPR compliance.",
    "CompetitorY is offering a similar solution at a lower cost.",
    "Your AI engine looks impressive, but the pricing model is unclear.",
    "How does your data pipeline compare with industry standards?",
    "We need advanced analytics for our sales team.",
    "Can you explain your renewal cost structure?",
    "Interested in understanding your budget-friendly options.",
    "CompetitorZ seems to have more flexible pricing.",
    "I want to evaluate your AI engine's capabilities.",
    "What makes your data pipeline unique?",
    "Looking for a cost-effective analytics solution.",
    "How competitive are your pricing models?",
];

/// Label sets authored alongside [`TEMPLATES`], index for index.
pub const LABEL_SETS: [&[&str]; 15] = [
    &["Positive", "Pricing Discussion", "Features"],
    &["Security", "Compliance"],
    &["Pricing Discussion", "Budget"],
    &["Security", "Compliance"],
    &["Competition", "Pricing Discussion"],
    &["Features", "Pricing Discussion"],
    &["Technical Capabilities"],
    &["Features", "Positive"],
    &["Pricing Discussion"],
    &["Budget", "Pricing Discussion"],
    &["Competition", "Pricing Discussion"],
    &["Features", "Technical Evaluation"],
    &["Technical Capabilities"],
    &["Budget", "Pricing Discussion"],
    &["Competition", "Pricing Discussion"],
];

/// One generated row before serialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetRow {
    pub id: u32,
    pub text: &'static str,
    pub labels: &'static [&'static str],
}

impl SnippetRow {
    /// Label set in its on-disk form.
    pub fn joined_labels(&self) -> String {
        self.labels.join(", ")
    }
}

/// Sample [`ROW_COUNT`] rows. Texts and label sets are drawn independently, so a
/// row's labels need not be the ones authored for its text.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Vec<SnippetRow> {
    let texts: Vec<&'static str> = (0..ROW_COUNT)
        .map(|_| TEMPLATES[rng.gen_range(0..TEMPLATES.len())])
        .collect();
    let labels: Vec<&'static [&'static str]> = (0..ROW_COUNT)
        .map(|_| LABEL_SETS[rng.gen_range(0..LABEL_SETS.len())])
        .collect();

    texts
        .into_iter()
        .zip(labels)
        .enumerate()
        .map(|(idx, (text, labels))| SnippetRow {
            id: idx as u32 + 1,
            text,
            labels,
        })
        .collect()
}

/// Write rows as `id,cleaned_text,labels`, replacing any existing file.
pub fn write_dataset(rows: &[SnippetRow], path: &Path) -> Result<DataFrame> {
    let ids: Vec<i64> = rows.iter().map(|r| i64::from(r.id)).collect();
    let texts: Vec<&str> = rows.iter().map(|r| r.text).collect();
    let labels: Vec<String> = rows.iter().map(SnippetRow::joined_labels).collect();

    let mut df = DataFrame::new(vec![
        Series::new("id".into(), ids),
        Series::new("cleaned_text".into(), texts),
        Series::new("labels".into(), labels),
    ])?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    info!(path = %path.display(), rows = df.height(), "wrote call dataset");
    Ok(df)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn templates_and_labels_line_up() {
        assert_eq!(TEMPLATES.len(), LABEL_SETS.len());
        assert!(LABEL_SETS.iter().all(|set| !set.is_empty()));
    }

    #[test]
    fn same_seed_same_rows() {
        let a = generate(&mut StdRng::seed_from_u64(7));
        let b = generate(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn joined_labels_use_comma_space() {
        let row = SnippetRow {
            id: 1,
            text: TEMPLATES[1],
            labels: LABEL_SETS[1],
        };
        assert_eq!(row.joined_labels(), "Security, Compliance");
    }
}
