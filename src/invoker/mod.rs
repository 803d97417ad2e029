//! Model invoker.
//!
//! Sends a [`ContentPayload`] to the configured [`VisionProvider`], parses the
//! answer as JSON and prices the call. No retries: provider failures go
//! straight back to the caller.

mod fence;
mod pricing;

pub use fence::{parse_model_json, strip_markdown_fence};
pub use pricing::{INPUT_USD_PER_MILLION, OUTPUT_USD_PER_MILLION, Pricing};

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::providers::VisionProvider;
use crate::telemetry;
use crate::types::{ContentPayload, ModelResult};
use crate::{Result, ScannerError};

/// Default model for product analysis.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Invokes the model and turns its answer into a [`ModelResult`].
#[derive(Clone)]
pub struct ModelInvoker {
    provider: Option<Arc<dyn VisionProvider>>,
    model: String,
    pricing: Pricing,
}

impl ModelInvoker {
    /// `provider` is `None` when no credential is configured; every
    /// invocation then fails with a configuration error.
    pub fn new(
        provider: Option<Arc<dyn VisionProvider>>,
        model: impl Into<String>,
        pricing: Pricing,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            pricing,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub async fn invoke(&self, content: &ContentPayload) -> Result<ModelResult> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            ScannerError::Configuration("OPENAI_API_KEY not set".to_string())
        })?;

        let start = Instant::now();
        let output = provider.complete(content, &self.model).await;
        metrics::histogram!(telemetry::MODEL_CALL_DURATION_SECONDS)
            .record(start.elapsed().as_secs_f64());

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                metrics::counter!(telemetry::MODEL_CALLS_TOTAL, "status" => "error").increment(1);
                warn!(provider = provider.name(), model = %self.model, error = %e, "model call failed");
                return Err(e);
            }
        };

        let usage = output.usage;
        metrics::counter!(telemetry::TOKENS_TOTAL, "direction" => "input")
            .increment(usage.input_tokens);
        metrics::counter!(telemetry::TOKENS_TOTAL, "direction" => "output")
            .increment(usage.output_tokens);

        let raw = output.text.trim().to_string();
        let result = match parse_model_json(&raw) {
            Ok(result) => {
                metrics::counter!(telemetry::MODEL_CALLS_TOTAL, "status" => "ok").increment(1);
                result
            }
            Err(e) => {
                metrics::counter!(telemetry::MODEL_CALLS_TOTAL, "status" => "invalid_output")
                    .increment(1);
                warn!(provider = provider.name(), model = %self.model, error = %e, "model returned invalid JSON");
                return Err(e);
            }
        };
        let estimated_cost_usd = self.pricing.cost(&usage);

        info!(
            provider = provider.name(),
            model = %self.model,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            estimated_cost_usd,
            "model call complete"
        );

        Ok(ModelResult {
            result,
            usage,
            estimated_cost_usd,
            raw,
        })
    }
}
