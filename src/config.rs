//! Validator options.
//!
//! Defaults can be overridden from the environment so that deployments can
//! tune error output without code changes.

use crate::error::DEFAULT_DISPLAY_BUDGET;

/// Maximum edit distance for "did you mean" format suggestions.
pub const DEFAULT_SUGGESTION_DISTANCE: usize = 3;

/// Tunables for a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Maximum characters of an offending value shown in an error message.
    pub display_budget: usize,

    /// Maximum edit distance for suggesting a known format name when an
    /// unknown one is used. Zero disables suggestions.
    pub suggestion_distance: usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            display_budget: env_or("CONFCHECK_DISPLAY_BUDGET", DEFAULT_DISPLAY_BUDGET),
            suggestion_distance: env_or("CONFCHECK_SUGGESTION_DISTANCE", DEFAULT_SUGGESTION_DISTANCE),
        }
    }
}

/// Parses an environment variable with a default value.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
