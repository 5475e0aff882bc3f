//! Configuration store contracts.
//!
//! The validator only ever reads from a store. [`Store`] is the synchronous
//! contract; [`AsyncStore`] is its asynchronous counterpart for stores backed
//! by remote services. Every `Store` is usable as an `AsyncStore`.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

/// A read-only source of configuration values addressed by key.
pub trait Store: Send + Sync {
    /// Returns the current value for `key`, or `None` when it is absent.
    fn get(&self, key: &str) -> Option<Value>;
}

/// An asynchronous source of configuration values addressed by key.
#[async_trait]
pub trait AsyncStore: Send + Sync {
    /// Returns the current value for `key`, or `None` when it is absent.
    async fn get(&self, key: &str) -> Option<Value>;
}

#[async_trait]
impl<T: Store + ?Sized> AsyncStore for T {
    async fn get(&self, key: &str) -> Option<Value> {
        Store::get(self, key)
    }
}

impl Store for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}

/// An in-memory hierarchical store over a JSON tree.
///
/// Keys are paths split on a separator (`.` by default). A key that exists
/// verbatim as a top-level field wins over path traversal, so flat keys such
/// as `app_port` and nested keys such as `server.port` both work. Numeric
/// path segments index into arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStore {
    root: Value,
    separator: char,
}

impl MemoryStore {
    /// Creates a store over `root`.
    #[must_use]
    pub const fn new(root: Value) -> Self {
        Self {
            root,
            separator: '.',
        }
    }

    /// Uses `separator` to split keys into path segments.
    #[must_use]
    pub const fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// The underlying JSON tree.
    #[must_use]
    pub const fn root(&self) -> &Value {
        &self.root
    }

    /// Sets `key` to `value`, creating intermediate objects as needed.
    ///
    /// Non-object values along the path are replaced by objects.
    pub fn set(&mut self, key: &str, value: Value) {
        let mut segments = key.split(self.separator).peekable();
        let mut node = &mut self.root;
        while let Some(segment) = segments.next() {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            let Value::Object(map) = node else {
                return;
            };
            if segments.peek().is_none() {
                map.insert(segment.to_string(), value);
                return;
            }
            node = map.entry(segment).or_insert(Value::Null);
        }
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.root.get(key) {
            return Some(value);
        }
        key.split(self.separator)
            .try_fold(&self.root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Value::Object(Map::new()))
    }
}

impl From<Value> for MemoryStore {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).cloned()
    }
}
