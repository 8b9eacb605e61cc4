//! Loading the snippet table the classifier is fitted on.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::PipelineError;

/// Training example read back from the generated CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: u32,
    pub text: String,
    pub labels: Vec<String>,
}

/// Read every row of `path`. The text column is the first header containing
/// `text`; a `labels` column is mandatory.
pub fn load_snippets(path: &Path) -> Result<Vec<Snippet>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening dataset {}", path.display()))?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let text_idx = headers
        .iter()
        .position(|h| h.to_lowercase().contains("text"))
        .ok_or_else(|| PipelineError::MissingTextColumn {
            path: path.to_path_buf(),
            headers: headers.clone(),
        })?;
    let labels_idx = headers.iter().position(|h| h == "labels").ok_or_else(|| {
        PipelineError::MissingLabelsColumn {
            path: path.to_path_buf(),
        }
    })?;
    let id_idx = headers.iter().position(|h| h == "id");
    debug!(text_column = %headers[text_idx], "resolved dataset columns");

    let mut snippets = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading row {} of {}", row + 1, path.display()))?;
        let id = id_idx
            .and_then(|idx| record.get(idx))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(row as u32 + 1);
        snippets.push(Snippet {
            id,
            text: record.get(text_idx).unwrap_or_default().to_string(),
            labels: split_labels(record.get(labels_idx).unwrap_or_default()),
        });
    }

    if snippets.is_empty() {
        return Err(PipelineError::EmptyDataset {
            path: path.to_path_buf(),
        }
        .into());
    }
    info!(path = %path.display(), rows = snippets.len(), "loaded call dataset");
    Ok(snippets)
}

/// Split a `", "`-joined label cell, dropping empty fragments.
pub fn split_labels(cell: &str) -> Vec<String> {
    cell.split(", ")
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn splits_label_cells() {
        assert_eq!(
            split_labels("Budget, Pricing Discussion"),
            vec!["Budget".to_string(), "Pricing Discussion".to_string()]
        );
        assert!(split_labels("").is_empty());
    }

    #[test]
    fn discovers_text_column_by_name() {
        let file = write_csv("id,Transcript_Text,labels\n3,\"Hello, there\",\"Positive, Features\"\n");
        let rows = load_snippets(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
        assert_eq!(rows[0].text, "Hello, there");
        assert_eq!(rows[0].labels, vec!["Positive", "Features"]);
    }

    #[test]
    fn missing_labels_column_is_fatal() {
        let file = write_csv("id,cleaned_text\n1,hello\n");
        let err = load_snippets(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingLabelsColumn { .. })
        ));
    }

    #[test]
    fn header_only_table_is_fatal() {
        let file = write_csv("id,cleaned_text,labels\n");
        assert!(load_snippets(file.path()).is_err());
    }
}
