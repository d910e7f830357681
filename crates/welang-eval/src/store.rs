//! Variable store and command table.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use welang_types::Value;

/// Variable name → value, in insertion order.
///
/// Overwriting an existing variable keeps its original position; only a
/// name that was absent moves the "last inserted" marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStore {
    entries: Vec<(String, Value)>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Insert or overwrite `name`.
    pub fn set(&mut self, name: &str, value: Value) {
        match self.position(name) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Reset `name` to `Integer(0)`, creating it if absent.
    pub fn declare(&mut self, name: &str) {
        self.set(name, Value::default());
    }

    /// Update an existing variable.
    /// Returns `true` if found and updated, `false` if not found.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Name of the most recently inserted variable.
    pub fn last_inserted(&self) -> Option<&str> {
        self.entries.last().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// Serializes as a map whose key order is the insertion order.
impl Serialize for VariableStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Alias → variable name.
///
/// Written by `!set command`, never consulted by any instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct CommandTable {
    bindings: BTreeMap<String, String>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `alias` to `variable`, replacing any earlier binding.
    pub fn bind(&mut self, alias: &str, variable: &str) {
        self.bindings.insert(alias.to_string(), variable.to_string());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.bindings.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(a, v)| (a.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_defaults_to_zero() {
        let mut store = VariableStore::new();
        store.declare("x");
        assert_eq!(store.get("x"), Some(&Value::Integer(0)));
    }

    #[test]
    fn redeclare_resets_value_and_keeps_position() {
        let mut store = VariableStore::new();
        store.declare("a");
        store.declare("b");
        store.set("a", Value::from("text"));
        store.declare("a");
        assert_eq!(store.get("a"), Some(&Value::Integer(0)));
        assert_eq!(store.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(store.last_inserted(), Some("b"));
    }

    #[test]
    fn set_upserts() {
        let mut store = VariableStore::new();
        store.set("x", Value::Integer(5));
        store.set("x", Value::Integer(6));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x"), Some(&Value::Integer(6)));
    }

    #[test]
    fn assign_requires_existing() {
        let mut store = VariableStore::new();
        assert!(!store.assign("y", Value::from("hi")));
        assert!(store.is_empty());
        store.declare("y");
        assert!(store.assign("y", Value::from("hi")));
        assert_eq!(store.get("y"), Some(&Value::from("hi")));
    }

    #[test]
    fn last_inserted_is_insertion_order_not_alphabetical() {
        let mut store = VariableStore::new();
        store.declare("zeta");
        store.declare("alpha");
        assert_eq!(store.last_inserted(), Some("alpha"));
        store.set("zeta", Value::Integer(1));
        assert_eq!(store.last_inserted(), Some("alpha"));
    }

    #[test]
    fn empty_store_has_no_last() {
        assert_eq!(VariableStore::new().last_inserted(), None);
    }

    #[test]
    fn store_serializes_in_insertion_order() {
        let mut store = VariableStore::new();
        store.declare("b");
        store.set("a", Value::from("t"));
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(
            json,
            r#"{"b":{"type":"integer","value":0},"a":{"type":"text","value":"t"}}"#
        );
    }

    #[test]
    fn command_table_bind_and_replace() {
        let mut commands = CommandTable::new();
        commands.bind("show", "a");
        commands.bind("show", "b");
        assert_eq!(commands.get("show"), Some("b"));
        assert_eq!(commands.len(), 1);
        assert_eq!(
            serde_json::to_string(&commands).unwrap(),
            r#"{"show":"b"}"#
        );
    }
}
