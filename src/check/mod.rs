//! Check specifications.
//!
//! A [`CheckSpec`] describes what a configuration value must satisfy. It is
//! stored as declared and only turned into an executable [`BoundCheck`] by
//! the [`CheckResolver`] when validation runs, so a bad specification
//! surfaces at validation time rather than when the rule is added.

pub mod resolver;
pub mod types;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use resolver::{BoundCheck, CheckResolver};
pub use types::parse_list;

/// A user-supplied predicate over a configuration value.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Builtin value types a check can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeMarker {
    /// A mapping, or a string holding JSON text
    Object,
    /// A sequence, or a string holding a comma-separated list
    Array,
    /// A string
    String,
    /// A finite number, or a string holding one
    Number,
    /// A boolean, or a recognised boolean token
    Boolean,
}

impl TypeMarker {
    /// All markers, in dispatch order.
    pub const ALL: [Self; 5] = [
        Self::Object,
        Self::Array,
        Self::String,
        Self::Number,
        Self::Boolean,
    ];

    /// The marker's type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Array => "Array",
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
        }
    }

    /// Finds the marker with exactly this type name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|marker| marker.name() == name)
    }

    /// Claim reported when a value is not of this type.
    #[must_use]
    pub fn claim(self) -> String {
        format!("must be of type {}", self.name())
    }
}

impl fmt::Display for TypeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a configuration value must satisfy.
#[derive(Clone)]
pub enum CheckSpec {
    /// The value must be of a builtin type
    Type(TypeMarker),
    /// The value must satisfy a named format such as `port` or `ip`
    Named(String),
    /// The value must equal one of the allowed values
    OneOf(Vec<Value>),
    /// The value must satisfy an arbitrary predicate
    Predicate(Predicate),
    /// A loosely typed specification, resolved by its shape
    ///
    /// Strings naming a type marker select that marker, other strings name
    /// a format, arrays list allowed values. Any other shape is rejected
    /// when validation runs.
    Declared(Value),
}

impl CheckSpec {
    /// Wraps a predicate function.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    /// Wraps a loosely typed specification.
    #[must_use]
    pub const fn declared(value: Value) -> Self {
        Self::Declared(value)
    }
}

impl fmt::Debug for CheckSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(marker) => f.debug_tuple("Type").field(marker).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::OneOf(values) => f.debug_tuple("OneOf").field(values).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::Declared(value) => f.debug_tuple("Declared").field(value).finish(),
        }
    }
}

impl From<TypeMarker> for CheckSpec {
    fn from(marker: TypeMarker) -> Self {
        Self::Type(marker)
    }
}

impl From<&str> for CheckSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for CheckSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl<T: Into<Value>> From<Vec<T>> for CheckSpec {
    fn from(values: Vec<T>) -> Self {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for CheckSpec {
    fn from(values: [T; N]) -> Self {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }
}

impl<'de> Deserialize<'de> for CheckSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::Declared)
    }
}
