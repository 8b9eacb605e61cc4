//! Multi-label snippet classifier: TF-IDF features, one forest per label.

use std::collections::BTreeSet;

use anyhow::{ensure, Result};
use linfa::{
    dataset::DatasetBase,
    traits::{Fit, Predict},
};
use ndarray::{Array1, Array2, Axis};
use tracing::{debug, info, instrument};

use crate::{
    data::dataset::Snippet,
    nlp::{
        forest::{ForestParams, RandomForest},
        tfidf::TfidfVectorizer,
    },
};

/// Maps label sets to indicator rows over a sorted vocabulary.
#[derive(Debug, Clone, Default)]
pub struct LabelBinarizer {
    classes: Vec<String>,
}

impl LabelBinarizer {
    pub fn fit<L: AsRef<[String]>>(label_sets: &[L]) -> Self {
        let classes: BTreeSet<String> = label_sets
            .iter()
            .flat_map(|set| set.as_ref().iter().cloned())
            .collect();
        Self {
            classes: classes.into_iter().collect(),
        }
    }

    /// Indicator matrix; labels outside the vocabulary are ignored.
    pub fn transform<L: AsRef<[String]>>(&self, label_sets: &[L]) -> Array2<bool> {
        let mut y = Array2::from_elem((label_sets.len(), self.classes.len()), false);
        for (row, set) in label_sets.iter().enumerate() {
            for label in set.as_ref() {
                if let Ok(col) = self.classes.binary_search(label) {
                    y[[row, col]] = true;
                }
            }
        }
        y
    }

    pub fn inverse_transform(&self, row: &Array1<bool>) -> Vec<String> {
        self.classes
            .iter()
            .zip(row.iter())
            .filter(|(_, on)| **on)
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// Tunables for [`SnippetClassifier::fit`].
#[derive(Debug, Clone, Copy)]
pub struct ClassifierParams {
    pub max_features: usize,
    pub n_trees: usize,
    pub seed: u64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            max_features: 5000,
            n_trees: 100,
            seed: 42,
        }
    }
}

/// Immutable after [`fit`](Self::fit); safe to share across threads.
pub struct SnippetClassifier {
    binarizer: LabelBinarizer,
    vectorizer: TfidfVectorizer,
    forests: Vec<RandomForest>,
}

impl SnippetClassifier {
    #[instrument(skip(snippets), fields(rows = snippets.len()))]
    pub fn fit(snippets: &[Snippet], params: ClassifierParams) -> Result<Self> {
        ensure!(!snippets.is_empty(), "cannot fit classifier on an empty table");

        let label_sets: Vec<&[String]> = snippets.iter().map(|s| s.labels.as_slice()).collect();
        let binarizer = LabelBinarizer::fit(&label_sets);
        let y = binarizer.transform(&label_sets);

        let texts: Vec<&str> = snippets.iter().map(|s| s.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts, params.max_features);
        let x = vectorizer.transform(&texts);
        debug!(
            vocabulary = vectorizer.vocabulary_size(),
            labels = binarizer.classes().len(),
            "vectorised training table"
        );

        let forest = ForestParams {
            n_trees: params.n_trees,
            seed: params.seed,
        };
        let forests = y
            .axis_iter(Axis(1))
            .map(|column| forest.fit(&DatasetBase::new(x.clone(), column.to_owned())))
            .collect::<Result<Vec<RandomForest>, linfa::Error>>()?;

        info!(
            labels = ?binarizer.classes(),
            trees = params.n_trees,
            "fitted snippet classifier"
        );
        Ok(Self {
            binarizer,
            vectorizer,
            forests,
        })
    }

    /// Predicted labels for `text`, in vocabulary order. A label is emitted
    /// when its forest's mean positive probability exceeds one half.
    pub fn classify(&self, text: &str) -> Vec<String> {
        let x = self.vectorizer.transform(&[text]);
        let row: Array1<bool> = self
            .forests
            .iter()
            .map(|forest| {
                let proba: Array1<f64> = forest.predict(&x);
                proba[0] > 0.5
            })
            .collect();
        self.binarizer.inverse_transform(&row)
    }

    pub fn labels(&self) -> &[String] {
        self.binarizer.classes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generator::{LABEL_SETS, TEMPLATES};

    fn snippet(id: u32, text: &str, labels: &[&str]) -> Snippet {
        Snippet {
            id,
            text: text.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn binarizer_sorts_and_round_trips() {
        let sets = vec![
            vec!["Security".to_string(), "Compliance".to_string()],
            vec!["Budget".to_string()],
        ];
        let binarizer = LabelBinarizer::fit(&sets);
        assert_eq!(binarizer.classes(), &["Budget", "Compliance", "Security"]);
        let y = binarizer.transform(&sets);
        assert_eq!(
            binarizer.inverse_transform(&y.row(0).to_owned()),
            vec!["Compliance", "Security"]
        );
    }

    #[test]
    fn learns_cleanly_separated_labels() {
        let mut rows = Vec::new();
        for i in 0..10 {
            rows.push(snippet(i * 2, "Are you SOC2 certified for GDPR", &["Compliance"]));
            rows.push(snippet(i * 2 + 1, "Any discount on the renewal price", &["Pricing Discussion"]));
        }
        let params = ClassifierParams {
            n_trees: 15,
            ..ClassifierParams::default()
        };
        let classifier = SnippetClassifier::fit(&rows, params).unwrap();
        assert_eq!(
            classifier.classify("are you soc2 certified for gdpr?"),
            vec!["Compliance"]
        );
        assert_eq!(
            classifier.classify("Any discount on the renewal price"),
            vec!["Pricing Discussion"]
        );
        assert!(classifier
            .classify("completely unrelated words")
            .iter()
            .all(|l| classifier.labels().contains(l)));
    }

    #[test]
    fn reproduces_labels_of_paired_templates() {
        let rows: Vec<Snippet> = (0..8)
            .flat_map(|_| TEMPLATES.iter().zip(LABEL_SETS.iter()))
            .enumerate()
            .map(|(idx, (text, labels))| snippet(idx as u32 + 1, text, labels))
            .collect();
        let classifier = SnippetClassifier::fit(&rows, ClassifierParams::default()).unwrap();
        for (text, labels) in TEMPLATES.iter().zip(LABEL_SETS.iter()) {
            let mut expected: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
            expected.sort();
            assert_eq!(classifier.classify(text), expected, "{text}");
        }
    }

    #[test]
    fn rare_word_label_survives_many_negatives() {
        let mut rows = vec![];
        for i in 0..10 {
            rows.push(snippet(i, "alpha", &["Hit"]));
        }
        let fillers = [
            "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
            "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra",
            "tango", "uniform", "victor", "whiskey", "xray", "yankee", "zulu", "apple", "banana",
            "cherry", "grape", "lemon",
        ];
        for (i, word) in fillers.iter().enumerate() {
            rows.push(snippet(10 + i as u32, word, &["Miss"]));
        }
        let classifier = SnippetClassifier::fit(&rows, ClassifierParams::default()).unwrap();
        assert_eq!(classifier.classify("alpha"), vec!["Hit"]);
        assert_eq!(classifier.classify("zulu"), vec!["Miss"]);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(SnippetClassifier::fit(&[], ClassifierParams::default()).is_err());
    }
}
