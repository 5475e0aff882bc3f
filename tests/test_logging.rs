//! Validation runs with a JSON subscriber installed at full verbosity.

use confcheck::observability::{LogFormat, init_logging};
use confcheck::{MemoryStore, ResolutionError, Validator};
use serde_json::json;

/// Spans and events of a run are emitted without disturbing its result.
#[test]
fn validation_runs_under_json_logging() {
    init_logging(LogFormat::Json, 3);

    let mut validator = Validator::new();
    validator
        .add_rule("server.port", "port")
        .add_rule("server.host", "fqdn");
    let store = MemoryStore::new(json!({"server": {"port": 70000, "host": "example.com"}}));

    let failures = validator.validate_store_silent(&store).unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].key(), Some("server.port"));

    validator.add_rule("server.host", "hostname");
    assert!(matches!(
        validator.validate_store_silent(&store),
        Err(ResolutionError::UnknownFormat { .. })
    ));

    // A second install is ignored.
    init_logging(LogFormat::Human, 0);
    assert!(validator.validate_store(&store).is_err());
}
