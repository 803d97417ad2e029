//! The request pipeline.
//!
//! [`Scanner::analyze`] drives one request through
//! cache lookup → content build → model call → cache store → validation.
//! Data only flows forward; no stage calls back into an earlier one.

mod builder;
mod request;

pub use builder::{DEFAULT_PROMPT_PATH, ScannerBuilder};
pub use request::{AnalyzeRequest, ImageSource, Upload};

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{InFlight, ResultCache};
use crate::content::ContentBuilder;
use crate::invoker::ModelInvoker;
use crate::schema;
use crate::types::{AnalyzeResponse, ModelResult, SourceId};
use crate::{Result, ScannerError};

/// Product scanner: the composition root of the pipeline.
pub struct Scanner {
    content: ContentBuilder,
    invoker: ModelInvoker,
    cache: ResultCache,
    inflight: InFlight,
}

impl Scanner {
    /// Create a new builder for configuring the scanner.
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::new()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn model(&self) -> &str {
        self.invoker.model()
    }

    /// Analyze one image.
    ///
    /// Schema defects do not fail the request; they are reported in
    /// `schema_errors`.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse> {
        request.validate()?;
        let source = request.source_id();
        let record = self.resolve(&source, request.source()).await?;

        let schema_errors = schema::validate(&record.result);
        if !schema_errors.is_empty() {
            debug!(%source, defects = schema_errors.len(), "result does not match schema");
        }

        if let Some(path) = request.raw_output_path() {
            tokio::fs::write(path, &record.raw).await.map_err(|e| {
                ScannerError::Io(format!("failed to write raw output to {path:?}: {e}"))
            })?;
        }

        Ok(AnalyzeResponse {
            data: record.result,
            schema_errors,
            usage: record.usage,
            estimated_cost_usd: record.estimated_cost_usd,
        })
    }

    /// Cached record for `source`, calling the model on a miss.
    async fn resolve(&self, source: &SourceId, image: &ImageSource) -> Result<ModelResult> {
        if let Some(hit) = self.cache.lookup(source).await {
            return Ok(hit);
        }

        let shared = self
            .inflight
            .run(&source.cache_key(), async {
                // A caller that settled just before this one may have stored it.
                if let Some(hit) = self.cache.peek(source).await {
                    return Ok(hit);
                }

                let result = self.call_model(image).await?;
                if let Err(e) = self.cache.store(source, &result).await {
                    warn!(%source, error = %e, "failed to write cache record");
                }
                Ok(result)
            })
            .await?;

        Ok(Arc::unwrap_or_clone(shared))
    }

    async fn call_model(&self, image: &ImageSource) -> Result<ModelResult> {
        let content = match image {
            ImageSource::File(upload) => {
                self.content
                    .from_bytes(&upload.bytes, &upload.filename)
                    .await?
            }
            ImageSource::Url(url) => self.content.from_url(url).await?,
        };
        self.invoker.invoke(&content).await
    }
}
