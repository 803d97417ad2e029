//! Result caching.
//!
//! - [`ResultCache`]: persistent, content-addressed records on disk, one per
//!   source identifier.
//! - [`InFlight`]: in-process coalescing of concurrent misses, so identical
//!   simultaneous requests pay for one model call.

pub mod disk;
pub mod inflight;

pub use disk::{DEFAULT_CACHE_DIR, ResultCache};
pub use inflight::InFlight;
