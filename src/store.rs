// SPDX-FileCopyrightText: The industry-model-tree authors
// SPDX-License-Identifier: MPL-2.0

use std::collections::{btree_map::Entry, BTreeMap};

use crate::{NodePath, Value};

/// Values of a single node, keyed by parameter name.
pub type ValueMap = BTreeMap<String, Value>;

/// Runtime data of nodes, keyed by node path.
///
/// Keying by path instead of by name keeps data of same-named nodes
/// in different branches apart. Entries are enumerated in path order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataStore {
    entries: BTreeMap<NodePath, ValueMap>,
}

impl DataStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite a value.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, path: &NodePath, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries
            .entry(path.clone())
            .or_default()
            .insert(key.into(), value)
    }

    #[must_use]
    pub fn get(&self, path: &NodePath, key: &str) -> Option<&Value> {
        self.entries.get(path)?.get(key)
    }

    #[must_use]
    pub fn get_or<'a>(&'a self, path: &NodePath, key: &str, default: &'a Value) -> &'a Value {
        self.get(path, key).unwrap_or(default)
    }

    /// Remove a value if present.
    pub fn delete(&mut self, path: &NodePath, key: &str) -> Option<Value> {
        let values = self.entries.get_mut(path)?;
        let removed = values.remove(key);
        if values.is_empty() {
            self.entries.remove(path);
        }
        removed
    }

    /// All values stored directly under a path.
    #[must_use]
    pub fn get_all(&self, path: &NodePath) -> Option<&ValueMap> {
        self.entries.get(path)
    }

    /// Accumulate a sample.
    ///
    /// Unlike [`Self::set()`] an existing value is never overwritten: a
    /// scalar becomes a list of the old and the new value, a list grows.
    pub fn append(&mut self, path: &NodePath, key: impl Into<String>, sample: Value) {
        let values = self.entries.entry(path.clone()).or_default();
        match values.entry(key.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push_sample(sample),
            Entry::Vacant(entry) => {
                entry.insert(sample);
            }
        }
    }

    /// Remove all entries at or below a path.
    ///
    /// Returns the number of removed paths.
    pub fn remove_subtree(&mut self, prefix: &NodePath) -> usize {
        let count_before = self.entries.len();
        self.entries.retain(|path, _| !path.starts_with(prefix));
        count_before - self.entries.len()
    }

    /// Move all entries at or below `from` to the same relative
    /// position below `to`.
    ///
    /// Moved values overwrite existing values with the same key.
    /// Returns the number of moved paths.
    pub fn move_subtree(&mut self, from: &NodePath, to: &NodePath) -> usize {
        if from == to {
            return 0;
        }
        let moved_paths = self
            .entries
            .keys()
            .filter(|path| path.starts_with(from))
            .cloned()
            .collect::<Vec<_>>();
        let moved = moved_paths
            .into_iter()
            .filter_map(|path| {
                let values = self.entries.remove(&path)?;
                let target =
                    NodePath::new(to.segments().chain(path.segments().skip(from.depth())));
                Some((target, values))
            })
            .collect::<Vec<_>>();
        let count = moved.len();
        for (target, values) in moved {
            self.entries.entry(target).or_default().extend(values);
        }
        count
    }

    /// All `(path, key, value)` triples in path order.
    pub fn entries(&self) -> impl Iterator<Item = (&NodePath, &str, &Value)> + '_ {
        self.entries.iter().flat_map(|(path, values)| {
            values
                .iter()
                .map(move |(key, value)| (path, key.as_str(), value))
        })
    }

    /// Number of paths with at least one value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
