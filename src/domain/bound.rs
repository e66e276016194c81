//! Bound call: the resolved name -> value mapping of one invocation

use std::collections::BTreeMap;

use crate::domain::parameter::Value;

/// Every schema parameter with its parsed or default value.
///
/// Created fresh per invocation and handed to the target handler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundCall {
    /// Sub-command names leading to the schema that produced this call
    path: Vec<String>,
    values: BTreeMap<String, Value>,
}

impl BoundCall {
    pub fn new(path: Vec<String>) -> Self {
        Self {
            path,
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub(crate) fn set_path(&mut self, path: Vec<String>) {
        self.path = path;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Flag state; absent or non-boolean reads as false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn list(&self, name: &str) -> &[Value] {
        self.get(name).and_then(Value::as_list).unwrap_or(&[])
    }

    pub fn map(&self, name: &str) -> Option<&BTreeMap<String, Value>> {
        self.get(name).and_then(Value::as_map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
