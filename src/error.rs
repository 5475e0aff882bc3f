//! Error types for `confcheck`
//!
//! Validation distinguishes two failure kinds. A [`ValidationError`] means a
//! configuration value failed a check; silent validation collects these.
//! A [`ResolutionError`] means a check specification could not be turned into
//! an executable check at all. That is a programming mistake, so it always
//! aborts validation and is never collected.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::value::{render, truncate_for_display};

/// Default number of characters of a value shown in an error message.
pub const DEFAULT_DISPLAY_BUDGET: usize = 100;

// ============================================================================
// Validation Errors
// ============================================================================

/// A configuration value failed a check.
///
/// The resolver that produces the error does not know which key it is
/// checking, so `key` starts out empty and is filled in by the validator.
/// The message is rendered on demand and never includes more than the
/// display budget's worth of the offending value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    key: Option<String>,
    value: Value,
    claim: String,
    display_budget: usize,
}

impl ValidationError {
    /// Creates an error for `value` failing `claim`, without a key.
    #[must_use]
    pub fn new(value: Value, claim: impl Into<String>) -> Self {
        Self {
            key: None,
            value,
            claim: claim.into(),
            display_budget: DEFAULT_DISPLAY_BUDGET,
        }
    }

    /// Returns this error attributed to `key`.
    ///
    /// An error that already names a key keeps it.
    #[must_use]
    pub fn with_key(self, key: impl Into<String>) -> Self {
        if self.key.is_some() {
            return self;
        }
        Self {
            key: Some(key.into()),
            ..self
        }
    }

    /// Returns this error with a different display budget for its message.
    #[must_use]
    pub fn with_display_budget(self, display_budget: usize) -> Self {
        Self {
            display_budget,
            ..self
        }
    }

    /// The configuration key whose value failed, once attributed.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The original, unmodified value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// What the value should have satisfied, e.g. `must be an IP address`.
    #[must_use]
    pub fn claim(&self) -> &str {
        &self.claim
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = render(&self.value);
        let shown = truncate_for_display(&rendered, self.display_budget);
        match &self.key {
            Some(key) => write!(f, "{key}: {} (got: {shown})", self.claim),
            None => write!(f, "{} (got: {shown})", self.claim),
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Resolution Errors
// ============================================================================

/// A check specification could not be resolved into an executable check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A named format does not exist in the format table
    #[error("unknown check: {name}{}", suggestion.as_ref().map_or_else(String::new, |s| format!(" (did you mean '{s}'?)")))]
    UnknownFormat {
        /// The name that was looked up
        name: String,
        /// Closest known format name, if any is near enough
        suggestion: Option<String>,
    },

    /// A loosely declared specification has an unsupported shape
    #[error("check must be a function or a known check string (got {found})")]
    MalformedSpec {
        /// Rendering of the offending specification
        found: String,
    },

    /// Validation was requested without a store on an unbound validator
    #[error("validator has no bound store; pass a store explicitly")]
    Unbound,
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Error returned by fail-fast validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A value failed a check
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A check specification could not be resolved
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl ValidateError {
    /// Returns the validation failure, if this is one.
    #[must_use]
    pub const fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Resolution(_) => None,
        }
    }

    /// Returns `true` for resolution (programming) errors.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}
