//! Model providers.
//!
//! [`VisionProvider`] is the seam between the scanner and a hosted model;
//! [`OpenAiClient`] is the production implementation.

pub mod openai;
pub mod traits;

pub use openai::OpenAiClient;
pub use traits::VisionProvider;
