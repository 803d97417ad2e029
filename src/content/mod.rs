//! Content builder.
//!
//! Turns an uploaded image (bytes + filename) or an image URL into a
//! [`ContentPayload`]: `[image reference, instruction text]`. The instruction
//! text is the same for both paths and comes from a [`PromptSource`].

mod prompt;

pub use prompt::PromptSource;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::Result;
use crate::types::{ContentPart, ContentPayload};

/// Media type used when the extension is unknown or missing.
pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
];

/// Media type for a filename, by extension (case-insensitive).
pub fn media_type_for(filename: &str) -> &'static str {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    ext.and_then(|ext| {
        MEDIA_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, media)| *media)
    })
    .unwrap_or(DEFAULT_MEDIA_TYPE)
}

/// `data:<media-type>;base64,<payload>` URI for raw image bytes.
pub fn data_uri(bytes: &[u8], filename: &str) -> String {
    format!(
        "data:{};base64,{}",
        media_type_for(filename),
        STANDARD.encode(bytes)
    )
}

/// Builds content payloads. The only side effect is reading the prompt.
#[derive(Debug, Clone)]
pub struct ContentBuilder {
    prompt: PromptSource,
}

impl ContentBuilder {
    pub fn new(prompt: PromptSource) -> Self {
        Self { prompt }
    }

    /// Payload for an uploaded image, embedded as a base64 data URI.
    pub async fn from_bytes(&self, bytes: &[u8], filename: &str) -> Result<ContentPayload> {
        let text = self.prompt.load().await?;
        Ok(ContentPayload::new(vec![
            ContentPart::image(data_uri(bytes, filename)),
            ContentPart::text(text),
        ]))
    }

    /// Payload for a remote image; the URL is passed through unchanged.
    pub async fn from_url(&self, url: &str) -> Result<ContentPayload> {
        let text = self.prompt.load().await?;
        Ok(ContentPayload::new(vec![
            ContentPart::image(url),
            ContentPart::text(text),
        ]))
    }
}
