//! Case-insensitive parameter mapping.
//!
//! Names are compared case-insensitively, but the casing under which a name was
//! first inserted is kept for output (JSON, reports, engine calls). Iteration
//! order is the case-insensitive name order, which is also the order the
//! canonical JSON file is written in.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::ParamError;
use crate::params::parse_scalar;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    value: String,
}

/// A named set of parameter values (`name -> "number[unit]"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: BTreeMap<String, Entry>,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting names that collide case-insensitively.
    ///
    /// On collision the second offending name is returned.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (k, v) in pairs {
            let name: String = k.into();
            if set.contains(&name) {
                return Err(name);
            }
            set.insert(name, v);
        }
        Ok(set)
    }

    /// Insert or replace a value.
    ///
    /// When a name already exists under different casing, the existing casing is
    /// kept and only the value is replaced. Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.entries.get_mut(&fold(&name)) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.insert(fold(&name), Entry { name, value });
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&fold(name)).map(|e| e.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&fold(name))
    }

    /// The stored casing of `name`, if present.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.entries.get(&fold(name)).map(|e| e.name.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&fold(name)).map(|e| e.value)
    }

    /// First alias present in the set, as `(stored name, value)`.
    pub fn first_of(&self, aliases: &[&str]) -> Option<(&str, &str)> {
        aliases.iter().find_map(|alias| {
            self.entries
                .get(&fold(alias))
                .map(|e| (e.name.as_str(), e.value.as_str()))
        })
    }

    /// Resolve the first present alias and parse it as a number.
    pub fn scalar(&self, aliases: &[&str]) -> Result<f64, ParamError> {
        let (_, value) = self.first_of(aliases).ok_or_else(|| ParamError::missing(aliases))?;
        parse_scalar(value)
    }

    /// Like [`ParameterSet::scalar`], but absence is not an error.
    pub fn scalar_opt(&self, aliases: &[&str]) -> Result<Option<f64>, ParamError> {
        self.first_of(aliases).map(|(_, v)| parse_scalar(v)).transpose()
    }

    /// Find a stored name matching a predicate on its normalized form.
    pub fn find_name(&self, mut pred: impl FnMut(&str) -> bool) -> Option<&str> {
        self.entries
            .values()
            .map(|e| e.name.as_str())
            .find(|name| pred(name))
    }

    /// Iterate `(name, value)` pairs in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|e| (e.name.as_str(), e.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
