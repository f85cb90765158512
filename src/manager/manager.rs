use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json;

use crate::configurationerror::ConfigurationError;

use super::namedobject::NamedJsonObject;


pub fn parse_json_value<T>(json_value: serde_json::Value) -> Result<T, ConfigurationError>
    where T: DeserializeOwned {
    serde_json::from_value(json_value).map_err(ConfigurationError::JsonParse)
}


/// Ordered registry of named objects.
///
/// Insertion order is kept so that terms and rules come back in declaration
/// order; lookups by name go through a hash index. Names are unique.
#[derive(Clone, Debug)]
pub struct Manager<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>
}


impl<V> Manager<V> {
    pub fn new() -> Manager<V> {
        Manager { index: HashMap::new(), entries: Vec::new() }
    }

    pub fn insert(&mut self, name: &str, value: V) -> Result<(), ConfigurationError> {
        if self.contains(name) {
            return Err(ConfigurationError::DuplicateName(name.to_owned()));
        }
        self.index.insert(name.to_owned(), self.entries.len());
        self.entries.push((name.to_owned(), value));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&V, ConfigurationError> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i].1)
            .ok_or_else(|| ConfigurationError::NameNotFound(name.to_owned()))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Reads the object's `name`, then hands the whole JSON value to
    /// `get_obj_from_json` for the type-specific fields.
    pub fn insert_obj_from_json(&mut self,
                                json_value: serde_json::Value,
                                get_obj_from_json: fn(serde_json::Value) -> Result<V, ConfigurationError>) -> Result<(), ConfigurationError> {
        let named_object: NamedJsonObject = parse_json_value(json_value.clone())?;
        let v = get_obj_from_json(json_value)?;
        self.insert(named_object.name(), v)
    }

    pub fn insert_obj_from_json_vec(&mut self,
                                    json_vec: &[serde_json::Value],
                                    get_obj_from_json: fn(serde_json::Value) -> Result<V, ConfigurationError>) -> Result<(), ConfigurationError> {
        for j in json_vec.iter() {
            self.insert_obj_from_json(j.clone(), get_obj_from_json)?;
        }
        Ok(())
    }
}

impl<V> Default for Manager<V> {
    fn default() -> Self {
        Manager::new()
    }
}
