//! Model results and analysis responses

use serde::{Deserialize, Serialize};

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// What a provider hands back: the model's text and its usage metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOutput {
    pub text: String,
    pub usage: Usage,
}

/// The full record of one model invocation.
///
/// This is also the on-disk cache record format. `result` is untyped JSON:
/// the product schema is validated after the fact, not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub result: serde_json::Value,
    pub usage: Usage,
    pub estimated_cost_usd: f64,
    pub raw: String,
}

/// Response of one analysis request.
///
/// Schema defects are reported as data alongside the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub data: serde_json::Value,
    pub schema_errors: Vec<String>,
    pub usage: Usage,
    pub estimated_cost_usd: f64,
}
