//! Instruction prompt loading.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Result, ScannerError};

/// Where the instruction text comes from.
///
/// File prompts are re-read on every request, so edits take effect without a
/// restart.
#[derive(Debug, Clone)]
pub enum PromptSource {
    File(PathBuf),
    Inline(String),
}

impl PromptSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        PromptSource::File(path.into())
    }

    pub fn inline(text: impl Into<String>) -> Self {
        PromptSource::Inline(text.into())
    }

    /// Load the prompt text verbatim.
    ///
    /// A missing or unreadable file is a configuration error.
    pub async fn load(&self) -> Result<String> {
        match self {
            PromptSource::Inline(text) => Ok(text.clone()),
            PromptSource::File(path) => read_prompt(path).await,
        }
    }
}

async fn read_prompt(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            ScannerError::Configuration(format!("prompt file not found at {path:?}"))
        }
        _ => ScannerError::Configuration(format!("failed to read prompt file {path:?}: {e}")),
    })
}
