//! `confcheck` - declarative validation rules for configuration stores
//!
//! Rules attach check specifications (a named format, a builtin type, a set
//! of allowed values or a predicate) to keys of a hierarchical configuration
//! store. A [`Validator`] resolves each specification when it runs and
//! either stops at the first failing value or collects every failure.

pub mod check;
pub mod config;
pub mod error;
pub mod format;
pub mod observability;
pub mod store;
pub mod validator;
pub mod value;

pub use check::{CheckSpec, Predicate, TypeMarker};
pub use config::ValidatorOptions;
pub use error::{ResolutionError, ValidateError, ValidationError};
pub use format::{Format, FormatLibrary, StandardFormats};
pub use store::{AsyncStore, MemoryStore, Store};
pub use validator::{RuleSet, Validator};
