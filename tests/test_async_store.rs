//! Validation against asynchronous stores.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use confcheck::{AsyncStore, CheckSpec, MemoryStore, ResolutionError, Validator};
use serde_json::{Value, json};

/// A store that answers after a delay and records lookups in order.
struct RemoteStore {
    values: HashMap<String, Value>,
    lookups: Mutex<Vec<String>>,
}

impl RemoteStore {
    fn new(values: &[(&str, Value)]) -> Self {
        Self {
            values: values
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl AsyncStore for RemoteStore {
    async fn get(&self, key: &str) -> Option<Value> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        self.lookups.lock().unwrap().push(key.to_string());
        self.values.get(key).cloned()
    }
}

#[tokio::test]
async fn async_silent_matches_sync_ordering() {
    let remote = RemoteStore::new(&[("a", json!("x")), ("b", json!(70000))]);
    let mut validator = Validator::new();
    validator
        .add_rule("a", "int")
        .add_rule("a", "ip")
        .add_rule("b", "port");

    let failures = validator.validate_async_silent(&remote).await.unwrap();
    let claims: Vec<_> = failures.iter().map(|e| (e.key(), e.claim())).collect();
    assert_eq!(
        claims,
        vec![
            (Some("a"), "must be an integer"),
            (Some("a"), "must be an IP address"),
            (Some("b"), "must be within range 0 - 65535"),
        ]
    );
    // one fetch per key, in registration order
    assert_eq!(remote.lookups(), vec!["a", "b"]);
}

#[tokio::test]
async fn async_fail_fast_stops_fetching() {
    let remote = RemoteStore::new(&[("a", json!("x")), ("b", json!(1))]);
    let mut validator = Validator::new();
    validator.add_rule("a", "int").add_rule("b", "port");

    let err = validator.validate_async(&remote).await.unwrap_err();
    assert_eq!(
        err.as_validation().and_then(|e| e.key()),
        Some("a")
    );
    assert_eq!(remote.lookups(), vec!["a"]);
}

#[tokio::test]
async fn async_resolution_errors_propagate() {
    let remote = RemoteStore::new(&[("a", json!("x"))]);
    let mut validator = Validator::new();
    validator
        .add_rule("a", CheckSpec::predicate(|_| false))
        .add_rule("a", "hostname");

    let result = validator.validate_async_silent(&remote).await;
    assert!(matches!(result, Err(ResolutionError::UnknownFormat { .. })));
}

#[tokio::test]
async fn sync_stores_work_with_async_validation() {
    let store = MemoryStore::new(json!({"server": {"ip": "10.0.0.1"}}));
    let mut validator = Validator::new();
    validator.add_rule("server.ip", "ipv4");
    assert!(validator.validate_async(&store).await.is_ok());
}
