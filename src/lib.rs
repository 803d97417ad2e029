//! prodscan - product scanner backend
//!
//! Takes a product photo (upload or URL), asks a multimodal model to
//! describe the product as JSON, checks the answer against the product
//! schema and caches the result on disk, keyed by a hash of the image
//! source.
//!
//! # Example
//!
//! ```rust,no_run
//! use prodscan::{AnalyzeRequest, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> prodscan::Result<()> {
//!     let scanner = Scanner::builder()
//!         .openai("sk-your-key")
//!         .cache_dir("cache")
//!         .prompt_file("prompt.txt")
//!         .build()?;
//!
//!     let response = scanner
//!         .analyze(AnalyzeRequest::url("https://example.com/cream.jpg"))
//!         .await?;
//!
//!     println!("{}", response.data);
//!     for defect in &response.schema_errors {
//!         eprintln!("schema: {defect}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod content;
pub mod error;
pub mod invoker;
pub mod providers;
pub mod scanner;
pub mod schema;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{Result, ScannerError};
pub use scanner::{AnalyzeRequest, ImageSource, Scanner, ScannerBuilder, Upload};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, version_string};

pub use types::{
    AnalyzeResponse, CacheKey, ContentPart, ContentPayload, ModelResult, ProviderOutput, SourceId,
    Usage,
};
