//! Builder for configuring scanner instances

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::Scanner;
use crate::Result;
use crate::cache::{DEFAULT_CACHE_DIR, InFlight, ResultCache};
use crate::content::{ContentBuilder, PromptSource};
use crate::invoker::{DEFAULT_MODEL, ModelInvoker, Pricing};
use crate::providers::openai::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::providers::{OpenAiClient, VisionProvider};

/// Default prompt file, relative to the working directory.
pub const DEFAULT_PROMPT_PATH: &str = "prompt.txt";

/// Builder for [`Scanner`].
///
/// Holds everything the pipeline needs explicitly: credential, model,
/// cache directory and prompt. No process-wide state.
pub struct ScannerBuilder {
    openai_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    provider: Option<Arc<dyn VisionProvider>>,
    model: String,
    cache_dir: PathBuf,
    prompt: PromptSource,
}

impl ScannerBuilder {
    pub fn new() -> Self {
        Self {
            openai_key: None,
            base_url: None,
            timeout: None,
            provider: None,
            model: DEFAULT_MODEL.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            prompt: PromptSource::file(DEFAULT_PROMPT_PATH),
        }
    }

    /// Use the OpenAI Responses API with this key.
    pub fn openai(mut self, api_key: impl Into<String>) -> Self {
        self.openai_key = Some(api_key.into());
        self
    }

    /// Override the OpenAI base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Timeout for each model call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a custom provider. Takes precedence over [`openai`](Self::openai).
    pub fn provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Read the instruction prompt from `path` on every request.
    pub fn prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt = PromptSource::file(path);
        self
    }

    pub fn prompt(mut self, prompt: PromptSource) -> Self {
        self.prompt = prompt;
        self
    }

    /// Build the scanner, creating the cache directory if needed.
    ///
    /// A missing credential is not fatal here: cached results can still be
    /// served, and model calls fail with a configuration error.
    pub fn build(self) -> Result<Scanner> {
        let provider: Option<Arc<dyn VisionProvider>> = match (self.provider, self.openai_key) {
            (Some(provider), _) => Some(provider),
            (None, Some(key)) => Some(Arc::new(OpenAiClient::with_options(
                key,
                self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
                self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            )?)),
            (None, None) => {
                warn!("no model credential configured; only cached results can be served");
                None
            }
        };

        Ok(Scanner {
            content: ContentBuilder::new(self.prompt),
            invoker: ModelInvoker::new(provider, self.model, Pricing::default()),
            cache: ResultCache::open(self.cache_dir)?,
            inflight: InFlight::new(),
        })
    }
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
