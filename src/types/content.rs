//! Content payload sent to a multimodal model

use serde::{Deserialize, Serialize};

/// One typed part of a user message.
///
/// Provider-agnostic: each provider maps parts onto its own wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Image reference: an `http(s)` URL or a `data:` URI.
    Image { url: String },
    /// Instruction text.
    Text { text: String },
}

impl ContentPart {
    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::Image { url: url.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }
}

/// Ordered parts of a single-turn request. Built per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub parts: Vec<ContentPart>,
}

impl ContentPayload {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self { parts }
    }

    /// The first image reference, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            ContentPart::Image { url } => Some(url.as_str()),
            ContentPart::Text { .. } => None,
        })
    }

    /// The first instruction text, if any.
    pub fn text(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            ContentPart::Text { text } => Some(text.as_str()),
            ContentPart::Image { .. } => None,
        })
    }
}
