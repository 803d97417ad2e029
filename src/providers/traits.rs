//! Provider trait for multimodal models.
//!
//! The scanner depends on [`VisionProvider`] rather than on a concrete HTTP
//! client, so tests and alternative backends plug in without touching the
//! pipeline.

use async_trait::async_trait;

use crate::Result;
use crate::types::{ContentPayload, ProviderOutput};

/// A model that accepts a single-turn image + text message and answers with
/// text.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Submit `content` as one user message to `model`.
    ///
    /// Returns the model's output text (untouched) and token usage.
    /// Implementations must not retry.
    async fn complete(&self, content: &ContentPayload, model: &str) -> Result<ProviderOutput>;
}
