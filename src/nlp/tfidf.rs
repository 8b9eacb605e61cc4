//! TF-IDF text vectorisation with an English stop-word list.

use std::collections::{BTreeMap, HashMap};

use ndarray::Array2;
use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

/// English stop words removed before counting terms.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Lowercased word tokens of length >= 2 with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !ENGLISH_STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// Fitted vocabulary and smoothed inverse document frequencies.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary from `documents`, keeping at most `max_features`
    /// terms by corpus frequency (ties broken alphabetically).
    pub fn fit<S: AsRef<str>>(documents: &[S], max_features: usize) -> Self {
        let mut term_count: BTreeMap<String, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let tokens = tokenize(doc.as_ref());
            let mut seen: Vec<&String> = Vec::new();
            for token in &tokens {
                *term_count.entry(token.clone()).or_default() += 1;
                if !seen.contains(&token) {
                    seen.push(token);
                    *doc_freq.entry(token.clone()).or_default() += 1;
                }
            }
        }

        let mut ranked: Vec<(String, usize)> = term_count.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(max_features);
        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        let n = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            })
            .collect();
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(idx, t)| (t.clone(), idx))
            .collect();

        Self {
            vocabulary,
            terms,
            idf,
        }
    }

    /// One L2-normalised row per document; unknown terms are ignored.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.terms.len()));
        for (row, doc) in documents.iter().enumerate() {
            for token in tokenize(doc.as_ref()) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    matrix[[row, col]] += 1.0;
                }
            }
            let mut norm = 0.0;
            for (col, idf) in self.idf.iter().enumerate() {
                matrix[[row, col]] *= idf;
                norm += matrix[[row, col]] * matrix[[row, col]];
            }
            if norm > 0.0 {
                let norm = norm.sqrt();
                matrix.row_mut(row).mapv_inplace(|v| v / norm);
            }
        }
        matrix
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
