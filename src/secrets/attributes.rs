//! Node attribute tree used for chain defaults and the `attribute` source.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Namespace holding chain settings inside the attribute tree.
pub const CHAIN_NAMESPACE: &str = "ssl_chain";

/// Free-form attribute tree, looked up by dotted key paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeAttributes(Value);

impl NodeAttributes {
    pub fn new(tree: Value) -> Self {
        Self(tree)
    }

    pub fn empty() -> Self {
        Self(Value::Object(Default::default()))
    }

    /// Look up a value by path segments. Missing segments and JSON `null` are `None`.
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        let mut node = &self.0;
        for segment in path {
            node = node.as_object()?.get(*segment)?;
        }
        if node.is_null() {
            None
        } else {
            Some(node)
        }
    }

    /// String lookup. Present-but-not-a-string values are `None`.
    pub fn read_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn read_bool(&self, path: &[&str]) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Read `ssl_chain.<key>` as a string, falling back to the top-level `<key>`
    /// when `fallback` is set.
    pub fn chain_str(&self, key: &str, fallback: bool) -> Option<String> {
        self.read_str(&[CHAIN_NAMESPACE, key])
            .or_else(|| if fallback { self.read_str(&[key]) } else { None })
            .map(str::to_string)
    }

    pub fn chain_bool(&self, key: &str, fallback: bool) -> Option<bool> {
        self.read_bool(&[CHAIN_NAMESPACE, key])
            .or_else(|| if fallback { self.read_bool(&[key]) } else { None })
    }

    /// Literal chain content for the `attribute` source.
    pub fn chain_content(&self) -> Option<&Value> {
        self.get(&[CHAIN_NAMESPACE, "content"])
    }
}

impl From<Value> for NodeAttributes {
    fn from(tree: Value) -> Self {
        Self::new(tree)
    }
}
