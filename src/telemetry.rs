//! Telemetry metric name constants.
//!
//! Hosts install their own `metrics` recorder (prometheus, statsd, ...).
//! Without one, every metric call is a no-op.
//!
//! All metrics are prefixed with `prodscan_`. Counters end in `_total`,
//! histograms carry their unit.

/// Result cache hits (disk records found and parsed).
pub const CACHE_HITS_TOTAL: &str = "prodscan_cache_hits_total";

/// Result cache misses, including corrupt records.
pub const CACHE_MISSES_TOTAL: &str = "prodscan_cache_misses_total";

/// Model invocations.
///
/// Labels: `status` ("ok" | "error" | "invalid_output"). Tokens are
/// counted for `invalid_output` calls too.
pub const MODEL_CALLS_TOTAL: &str = "prodscan_model_calls_total";

/// Model call duration in seconds.
pub const MODEL_CALL_DURATION_SECONDS: &str = "prodscan_model_call_duration_seconds";

/// Tokens billed by the provider.
///
/// Labels: `direction` ("input" | "output").
pub const TOKENS_TOTAL: &str = "prodscan_tokens_total";
