//! Markdown fence stripping for model output.
//!
//! Models often wrap JSON in a fenced block. Only one leading fence line and
//! one trailing fence are removed.

use crate::{Result, ScannerError};

const FENCE: &str = "```";

/// Strip one leading ```` ``` ```` line and everything from the last
/// ```` ``` ```` onward.
///
/// Text that does not start with a fence is returned trimmed. Returns `None`
/// when the text starts with a fence but has no line break after it.
pub fn strip_markdown_fence(text: &str) -> Option<&str> {
    let text = text.trim();
    if !text.starts_with(FENCE) {
        return Some(text);
    }

    let (_, rest) = text.split_once('\n')?;
    let body = match rest.rfind(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(body.trim())
}

/// Parse model output as JSON, tolerating a markdown fence.
///
/// Failures carry the unmodified text in `raw`.
pub fn parse_model_json(raw: &str) -> Result<serde_json::Value> {
    let body = strip_markdown_fence(raw).ok_or_else(|| ScannerError::InvalidModelOutput {
        message: "code fence without a line break".to_string(),
        raw: raw.to_string(),
    })?;

    serde_json::from_str(body).map_err(|e| ScannerError::InvalidModelOutput {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}
