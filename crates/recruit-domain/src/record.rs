//! Snapshot of every form field and the patch format used when importing.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::{error::DomainError, fields::FieldKey};

/// Field values keyed by [`FieldKey`]. Always holds one entry per field;
/// unset fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRecord {
    values: BTreeMap<FieldKey, String>,
}

impl Default for FormRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl FormRecord {
    pub fn new() -> Self {
        Self {
            values: FieldKey::ALL
                .iter()
                .map(|key| (*key, String::new()))
                .collect(),
        }
    }

    pub fn get(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Raw non-empty check; whitespace-only values count as filled here.
    pub fn is_filled(&self, key: FieldKey) -> bool {
        !self.get(key).is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn apply(&mut self, patch: &FormPatch) {
        for (key, value) in patch.iter() {
            self.set(key, value);
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for FormRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key.record_key(), value)?;
        }
        map.end()
    }
}

/// Recognized entries read from an imported record, in field-table order.
///
/// Keys missing from the source are absent from the patch, so applying it
/// leaves those fields untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPatch {
    entries: BTreeMap<FieldKey, String>,
}

impl FormPatch {
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, DomainError> {
        let Value::Object(object) = value else {
            return Err(DomainError::InvalidRecord(
                "expected a JSON object at the top level".into(),
            ));
        };

        let entries = object
            .iter()
            .filter_map(|(name, raw)| {
                FieldKey::from_record_key(name).map(|key| (key, scalar_text(raw)))
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
