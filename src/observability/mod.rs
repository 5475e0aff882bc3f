//! Observability
//!
//! Validation runs emit `tracing` events: run start and summary, a span per
//! configuration key, each failed check, and aborted runs. This module lets
//! an embedding binary route them to stderr.

pub mod logging;

pub use logging::{KEY_SPAN, LOG_TARGET, LogFormat, filter_directive, init_logging};
