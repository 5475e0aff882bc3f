//! Rule registry and validation runs.
//!
//! A [`Validator`] maps configuration keys to ordered lists of check
//! specifications. Specifications are resolved only when validation runs,
//! so adding a rule never fails.
//!
//! Two modes exist:
//!
//! - fail-fast ([`Validator::validate`]): the first failing check aborts the
//!   run and is returned as the error;
//! - silent ([`Validator::validate_silent`]): every check runs and failures
//!   are collected.
//!
//! In both modes a specification that cannot be resolved aborts the run,
//! and the silent variants return it as their error type, so it can never
//! end up in the collected list.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, debug_span, info, trace, warn};

use crate::check::{CheckResolver, CheckSpec};
use crate::config::ValidatorOptions;
use crate::error::{ResolutionError, ValidateError, ValidationError};
use crate::format::{FormatLibrary, StandardFormats};
use crate::observability::KEY_SPAN;
use crate::store::{AsyncStore, Store};

// ============================================================================
// Rule Set
// ============================================================================

/// Ordered mapping from configuration key to its checks.
///
/// Keys iterate in first-registration order and checks within a key in the
/// order they were added.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Vec<CheckSpec>>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `spec` to the checks of `key`.
    pub fn add(&mut self, key: impl Into<String>, spec: impl Into<CheckSpec>) {
        self.rules.entry(key.into()).or_default().push(spec.into());
    }

    /// Removes all checks for `key`, returning them.
    ///
    /// The remaining keys keep their order.
    pub fn remove(&mut self, key: &str) -> Option<Vec<CheckSpec>> {
        self.rules.shift_remove(key)
    }

    /// Removes every rule.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// The checks registered for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[CheckSpec]> {
        self.rules.get(key).map(Vec::as_slice)
    }

    /// Iterates `(key, checks)` in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CheckSpec])> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Registered keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Number of keys with rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of checks across all keys.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

// ============================================================================
// Validator
// ============================================================================

/// How a run reacts to a failing check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    FailFast,
    Collect,
}

/// Validates configuration values against registered rules.
///
/// ```
/// use std::sync::Arc;
/// use confcheck::{MemoryStore, Validator};
/// use serde_json::json;
///
/// let store = MemoryStore::new(json!({"app_ip": "120.0.0.1", "app_port": 70000}));
/// let mut validator = Validator::bind(Arc::new(store));
/// validator.add_rule("app_ip", "ip").add_rule("app_port", "port");
///
/// let err = validator.validate().unwrap_err();
/// assert_eq!(err.to_string(), "app_port: must be within range 0 - 65535 (got: 70000)");
/// ```
#[derive(Clone)]
pub struct Validator {
    rules: RuleSet,
    store: Option<Arc<dyn Store>>,
    formats: Arc<dyn FormatLibrary>,
    options: ValidatorOptions,
}

impl Validator {
    /// Creates a validator with no default store.
    ///
    /// Stores must then be passed to each validation call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RuleSet::new(),
            store: None,
            formats: Arc::new(StandardFormats),
            options: ValidatorOptions::default(),
        }
    }

    /// Creates a validator bound to `store` as its default store.
    #[must_use]
    pub fn bind(store: Arc<dyn Store>) -> Self {
        Self {
            store: Some(store),
            ..Self::new()
        }
    }

    /// Replaces the format predicates.
    #[must_use]
    pub fn with_formats(mut self, formats: Arc<dyn FormatLibrary>) -> Self {
        self.formats = formats;
        self
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// The registered rules.
    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Adds a check for `key` after any checks already registered for it.
    ///
    /// The specification is not inspected until validation runs.
    pub fn add_rule(&mut self, key: impl Into<String>, spec: impl Into<CheckSpec>) -> &mut Self {
        self.rules.add(key, spec);
        self
    }

    /// Removes the checks for `key`, or every check when `key` is `None`.
    pub fn clear_rules(&mut self, key: Option<&str>) {
        match key {
            Some(key) => {
                self.rules.remove(key);
            }
            None => self.rules.clear(),
        }
    }

    // ------------------------------------------------------------------------
    // Synchronous validation
    // ------------------------------------------------------------------------

    /// Validates the bound store, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidateError::Validation`] for the first failing check,
    /// or [`ValidateError::Resolution`] when a specification cannot be
    /// resolved or no store is bound.
    pub fn validate(&self) -> Result<(), ValidateError> {
        let store = self.bound_store()?;
        self.validate_store(store)
    }

    /// Validates `store`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate`], except that no bound store is needed.
    pub fn validate_store(&self, store: &dyn Store) -> Result<(), ValidateError> {
        self.log_start(Mode::FailFast);
        let mut failures = Vec::new();
        for (key, checks) in self.rules.iter() {
            let value = Store::get(store, key).unwrap_or(Value::Null);
            self.run_checks(key, checks, &value, Mode::FailFast, &mut failures)?;
            if let Some(err) = failures.pop() {
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Validates the bound store, running every check.
    ///
    /// Returns the failures in key registration order, then check order.
    /// An empty list means every check passed.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolutionError`] when a specification cannot be resolved
    /// or no store is bound. Failures collected before that are discarded.
    pub fn validate_silent(&self) -> Result<Vec<ValidationError>, ResolutionError> {
        let store = self.bound_store()?;
        self.validate_store_silent(store)
    }

    /// Validates `store`, running every check.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate_silent`], except that no bound store is
    /// needed.
    pub fn validate_store_silent(
        &self,
        store: &dyn Store,
    ) -> Result<Vec<ValidationError>, ResolutionError> {
        self.log_start(Mode::Collect);
        let mut failures = Vec::new();
        for (key, checks) in self.rules.iter() {
            let value = Store::get(store, key).unwrap_or(Value::Null);
            self.run_checks(key, checks, &value, Mode::Collect, &mut failures)?;
        }
        info!(failures = failures.len(), "silent validation finished");
        Ok(failures)
    }

    // ------------------------------------------------------------------------
    // Asynchronous validation
    // ------------------------------------------------------------------------

    /// Validates an asynchronous store, stopping at the first failure.
    ///
    /// Suspends only while fetching each key's value.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate_store`].
    pub async fn validate_async(&self, store: &dyn AsyncStore) -> Result<(), ValidateError> {
        self.log_start(Mode::FailFast);
        let mut failures = Vec::new();
        for (key, checks) in self.rules.iter() {
            let value = store.get(key).await.unwrap_or(Value::Null);
            self.run_checks(key, checks, &value, Mode::FailFast, &mut failures)?;
            if let Some(err) = failures.pop() {
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Validates an asynchronous store, running every check.
    ///
    /// # Errors
    ///
    /// Same as [`Validator::validate_store_silent`].
    pub async fn validate_async_silent(
        &self,
        store: &dyn AsyncStore,
    ) -> Result<Vec<ValidationError>, ResolutionError> {
        self.log_start(Mode::Collect);
        let mut failures = Vec::new();
        for (key, checks) in self.rules.iter() {
            let value = store.get(key).await.unwrap_or(Value::Null);
            self.run_checks(key, checks, &value, Mode::Collect, &mut failures)?;
        }
        info!(failures = failures.len(), "silent validation finished");
        Ok(failures)
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn bound_store(&self) -> Result<&dyn Store, ResolutionError> {
        self.store.as_deref().ok_or(ResolutionError::Unbound)
    }

    fn log_start(&self, mode: Mode) {
        info!(
            keys = self.rules.len(),
            checks = self.rules.check_count(),
            ?mode,
            "validating configuration"
        );
    }

    /// Runs the checks of one key against a single snapshot of its value.
    ///
    /// Failures are pushed to `failures` with the key attached. In
    /// fail-fast mode at most one failure is pushed and the remaining
    /// checks are skipped.
    fn run_checks(
        &self,
        key: &str,
        checks: &[CheckSpec],
        value: &Value,
        mode: Mode,
        failures: &mut Vec<ValidationError>,
    ) -> Result<(), ResolutionError> {
        let resolver = CheckResolver::new(self.formats.as_ref())
            .with_suggestion_distance(self.options.suggestion_distance);
        let _span = debug_span!(KEY_SPAN, key, checks = checks.len()).entered();

        for (index, spec) in checks.iter().enumerate() {
            let check = resolver.resolve(spec).inspect_err(|e| {
                warn!(index, error = %e, "check specification could not be resolved");
            })?;
            trace!(index, ?spec, "running check");

            if let Err(err) = check.run(value) {
                let err = err
                    .with_key(key)
                    .with_display_budget(self.options.display_budget);
                debug!(index, claim = err.claim(), "check failed");
                failures.push(err);
                if mode == Mode::FailFast {
                    break;
                }
            }
        }
        Ok(())
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rules)
            .field("bound", &self.store.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
