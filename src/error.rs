//! Typed failures raised while loading startup inputs.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no text column in {path} (headers: {headers:?})")]
    MissingTextColumn { path: PathBuf, headers: Vec<String> },
    #[error("no `labels` column in {path}")]
    MissingLabelsColumn { path: PathBuf },
    #[error("training table {path} has no rows")]
    EmptyDataset { path: PathBuf },
}
