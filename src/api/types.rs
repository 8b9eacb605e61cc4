//! Request and response bodies.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}
