//! Usage cost estimation.

use crate::types::Usage;

/// USD per million input tokens.
pub const INPUT_USD_PER_MILLION: f64 = 3.0;

/// USD per million output tokens.
pub const OUTPUT_USD_PER_MILLION: f64 = 15.0;

/// Token prices used for `estimated_cost_usd`.
///
/// Fixed at build time; the defaults are the only rates the service uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub input_per_million: f64,
    pub output_per_million: f64,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            input_per_million: INPUT_USD_PER_MILLION,
            output_per_million: OUTPUT_USD_PER_MILLION,
        }
    }
}

impl Pricing {
    /// Estimated cost in USD, rounded to 6 decimal places.
    pub fn cost(&self, usage: &Usage) -> f64 {
        let cost = usage.input_tokens as f64 / 1_000_000.0 * self.input_per_million
            + usage.output_tokens as f64 / 1_000_000.0 * self.output_per_million;
        round6(cost)
    }
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
