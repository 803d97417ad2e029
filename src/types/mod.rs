//! Public types for the scanner API.

mod content;
mod result;
mod source;

pub use content::{ContentPart, ContentPayload};
pub use result::{AnalyzeResponse, ModelResult, ProviderOutput, Usage};
pub use source::{CacheKey, SourceId};
