//! Resolution of check specifications into executable checks.
//!
//! Resolution is stateless dispatch on the shape of a [`CheckSpec`], in this
//! order: builtin type marker, format name, allowed-value list, predicate.
//! The resulting [`BoundCheck`] borrows from the specification and the
//! format library; it is built per validation run and never stored.

use serde_json::Value;

use super::types::matches_type;
use super::{CheckSpec, Predicate, TypeMarker};
use crate::config::DEFAULT_SUGGESTION_DISTANCE;
use crate::error::{ResolutionError, ValidationError};
use crate::format::{Format, FormatLibrary};
use crate::value::{coerce_text, render, truncate_for_display};

/// Claim used for predicates, which carry no description of their own.
pub const PREDICATE_CLAIM: &str = "must be a valid value";

/// Prefix of the claim for allowed-value lists.
pub const ONE_OF_CLAIM_PREFIX: &str = "must be one of the possible values: ";

/// Characters of a malformed specification quoted in the resolution error.
const MALFORMED_DISPLAY_BUDGET: usize = 60;

/// Maps check specifications to executable checks.
#[derive(Clone, Copy)]
pub struct CheckResolver<'a> {
    formats: &'a dyn FormatLibrary,
    suggestion_distance: usize,
}

impl<'a> CheckResolver<'a> {
    /// Creates a resolver backed by `formats`.
    #[must_use]
    pub fn new(formats: &'a dyn FormatLibrary) -> Self {
        Self {
            formats,
            suggestion_distance: DEFAULT_SUGGESTION_DISTANCE,
        }
    }

    /// Sets how far a mistyped format name may be from a suggestion.
    #[must_use]
    pub const fn with_suggestion_distance(mut self, distance: usize) -> Self {
        self.suggestion_distance = distance;
        self
    }

    /// Resolves `spec` into a check that can be run against values.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError::UnknownFormat`] for a format name missing
    /// from the table, and [`ResolutionError::MalformedSpec`] for a declared
    /// specification of unsupported shape.
    pub fn resolve<'s>(&self, spec: &'s CheckSpec) -> Result<BoundCheck<'s>, ResolutionError>
    where
        'a: 's,
    {
        match spec {
            CheckSpec::Type(marker) => Ok(BoundCheck::Type(*marker)),
            CheckSpec::Named(name) => self.resolve_name(name),
            CheckSpec::OneOf(allowed) => Ok(BoundCheck::OneOf(allowed)),
            CheckSpec::Predicate(predicate) => Ok(BoundCheck::Predicate(predicate)),
            CheckSpec::Declared(declared) => self.resolve_declared(declared),
        }
    }

    fn resolve_declared<'s>(&self, declared: &'s Value) -> Result<BoundCheck<'s>, ResolutionError>
    where
        'a: 's,
    {
        match declared {
            Value::String(name) => TypeMarker::from_name(name)
                .map_or_else(|| self.resolve_name(name), |marker| Ok(BoundCheck::Type(marker))),
            Value::Array(allowed) => Ok(BoundCheck::OneOf(allowed)),
            other => Err(ResolutionError::MalformedSpec {
                found: truncate_for_display(&render(other), MALFORMED_DISPLAY_BUDGET).into_owned(),
            }),
        }
    }

    fn resolve_name<'s>(&self, name: &str) -> Result<BoundCheck<'s>, ResolutionError>
    where
        'a: 's,
    {
        Format::lookup(name)
            .map(|format| BoundCheck::Format {
                format,
                library: self.formats,
            })
            .ok_or_else(|| ResolutionError::UnknownFormat {
                name: name.to_string(),
                suggestion: Format::suggest(name, self.suggestion_distance),
            })
    }
}

/// An executable check.
#[derive(Clone, Copy)]
pub enum BoundCheck<'s> {
    /// Builtin type check
    Type(TypeMarker),
    /// Named format check
    Format {
        /// The canonical format (aliases already resolved)
        format: Format,
        /// Predicates deciding acceptance
        library: &'s dyn FormatLibrary,
    },
    /// Membership in a list of allowed values
    OneOf(&'s [Value]),
    /// User predicate
    Predicate(&'s Predicate),
}

impl BoundCheck<'_> {
    /// Runs the check against `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] without a key when the value fails.
    pub fn run(&self, value: &Value) -> Result<(), ValidationError> {
        let passed = match self {
            Self::Type(marker) => matches_type(*marker, value),
            Self::Format { format, library } => library.accepts(*format, &coerce_text(value)),
            Self::OneOf(allowed) => allowed.iter().any(|candidate| is_member(value, candidate)),
            Self::Predicate(predicate) => predicate(value),
        };

        if passed {
            Ok(())
        } else {
            Err(ValidationError::new(value.clone(), self.claim()))
        }
    }

    /// The claim reported when this check fails.
    #[must_use]
    pub fn claim(&self) -> String {
        match self {
            Self::Type(marker) => marker.claim(),
            Self::Format { format, .. } => format.claim().to_string(),
            Self::OneOf(allowed) => {
                let listed: Vec<_> = allowed.iter().map(render).collect();
                format!("{ONE_OF_CLAIM_PREFIX}{}", listed.join(","))
            }
            Self::Predicate(_) => PREDICATE_CLAIM.to_string(),
        }
    }
}

/// Enumeration membership.
///
/// Values compare structurally. A string also matches a number whose
/// JSON text it spells, so `"443"` read from the environment matches `443`.
/// An absent value never matches.
fn is_member(value: &Value, candidate: &Value) -> bool {
    match (value, candidate) {
        (Value::Null, _) => false,
        (Value::String(text), Value::Number(n)) => text.trim() == n.to_string(),
        _ => value == candidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::StandardFormats;
    use serde_json::json;

    fn run(spec: &CheckSpec, value: &Value) -> Result<(), ValidationError> {
        CheckResolver::new(&StandardFormats)
            .resolve(spec)
            .expect("spec should resolve")
            .run(value)
    }

    #[test]
    fn port_failure_carries_fixed_claim() {
        let err = run(&CheckSpec::from("port"), &json!(70000)).unwrap_err();
        assert_eq!(err.claim(), "must be within range 0 - 65535");
        assert_eq!(err.value(), &json!(70000));
        assert_eq!(err.key(), None);
    }

    #[test]
    fn numbers_are_checked_as_text() {
        assert!(run(&CheckSpec::from("port"), &json!(3000)).is_ok());
        assert!(run(&CheckSpec::from("int"), &json!("3000")).is_ok());
        assert!(run(&CheckSpec::from("int"), &json!(1.5)).is_err());
    }

    #[test]
    fn absent_value_fails_format_checks() {
        assert!(run(&CheckSpec::from("ip"), &Value::Null).is_err());
        assert!(run(&CheckSpec::from("*"), &Value::Null).is_ok());
    }

    #[test]
    fn one_of_lists_allowed_values() {
        let spec = CheckSpec::from(["a", "b"]);
        assert!(run(&spec, &json!("a")).is_ok());
        let err = run(&spec, &json!("c")).unwrap_err();
        assert_eq!(err.claim(), "must be one of the possible values: a,b");
    }

    #[test]
    fn one_of_accepts_numeric_text_for_numbers() {
        let spec = CheckSpec::from(vec![json!(80), json!(443)]);
        assert!(run(&spec, &json!("443")).is_ok());
        assert!(run(&spec, &json!(443)).is_ok());
        assert!(run(&spec, &json!(8080)).is_err());
    }

    #[test]
    fn one_of_requires_equal_values() {
        let spec = CheckSpec::from(vec![json!(true), json!("443")]);
        assert!(run(&spec, &json!(true)).is_ok());
        assert!(run(&spec, &json!("true")).is_err());
        assert!(run(&spec, &json!(443)).is_err());
    }

    #[test]
    fn absent_value_is_never_a_member() {
        for spec in [CheckSpec::from(["null", "x"]), CheckSpec::from(vec![Value::Null])] {
            let err = run(&spec, &Value::Null).unwrap_err();
            assert!(err.claim().starts_with(ONE_OF_CLAIM_PREFIX));
        }
    }

    #[test]
    fn predicate_failure_uses_generic_claim() {
        let spec = CheckSpec::predicate(|v| v.as_str().is_some_and(|s| !s.is_empty()));
        assert!(run(&spec, &json!("admin")).is_ok());
        let err = run(&spec, &json!("")).unwrap_err();
        assert_eq!(err.claim(), PREDICATE_CLAIM);
    }

    #[test]
    fn type_marker_claim() {
        let err = run(&CheckSpec::from(TypeMarker::String), &json!(5)).unwrap_err();
        assert_eq!(err.claim(), "must be of type String");
    }

    #[test]
    fn unknown_format_is_a_resolution_error() {
        let resolver = CheckResolver::new(&StandardFormats);
        let spec = CheckSpec::from("prot");
        match resolver.resolve(&spec) {
            Err(ResolutionError::UnknownFormat { name, suggestion }) => {
                assert_eq!(name, "prot");
                assert_eq!(suggestion.as_deref(), Some("port"));
            }
            _ => panic!("expected UnknownFormat"),
        }
    }

    #[test]
    fn suggestion_distance_zero_disables_suggestions() {
        let resolver = CheckResolver::new(&StandardFormats).with_suggestion_distance(0);
        let spec = CheckSpec::from("prot");
        assert!(matches!(
            resolver.resolve(&spec),
            Err(ResolutionError::UnknownFormat { suggestion: None, .. })
        ));
    }

    #[test]
    fn declared_specs_dispatch_by_shape() {
        assert!(run(&CheckSpec::declared(json!("Boolean")), &json!("yes")).is_ok());
        assert!(run(&CheckSpec::declared(json!("ipv4")), &json!("10.0.0.1")).is_ok());
        assert!(run(&CheckSpec::declared(json!(["x", "y"])), &json!("y")).is_ok());

        let resolver = CheckResolver::new(&StandardFormats);
        let spec = CheckSpec::declared(json!({"min": 1}));
        match resolver.resolve(&spec) {
            Err(ResolutionError::MalformedSpec { found }) => assert_eq!(found, r#"{"min":1}"#),
            _ => panic!("expected MalformedSpec"),
        }
    }

    #[test]
    fn aliases_resolve_to_the_canonical_format() {
        let resolver = CheckResolver::new(&StandardFormats);
        for (alias, canonical) in [
            ("domain", Format::Fqdn),
            ("ipaddress", Format::Ip),
            ("integer", Format::Int),
        ] {
            let spec = CheckSpec::from(alias);
            match resolver.resolve(&spec) {
                Ok(BoundCheck::Format { format, .. }) => assert_eq!(format, canonical),
                _ => panic!("alias '{alias}' did not resolve to a format"),
            }
        }
    }
}
