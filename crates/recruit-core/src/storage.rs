use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use recruit_domain::{FieldKey, FormRecord, QuestionSet};

use crate::CoreError;

/// Editable form inputs. Values are raw, untrimmed text.
pub trait FieldStore {
    fn value(&self, key: FieldKey) -> String;
    fn set_value(&mut self, key: FieldKey, value: &str);
    fn is_required(&self, key: FieldKey) -> bool;
    fn set_required(&mut self, key: FieldKey, required: bool);
    fn focus(&mut self, key: FieldKey);
    fn set_invalid(&mut self, key: FieldKey, invalid: bool);
}

/// Durable string store scoped to the local machine.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&mut self, key: &str) -> Result<(), CoreError>;
}

/// Supplies the question definition for one assistant.
pub trait QuestionSource {
    fn fetch(&self) -> Result<QuestionSet, CoreError>;
}

/// Hands a generated payload to the user as a named file.
pub trait FileExporter {
    /// Returns where the payload ended up.
    fn export(&mut self, payload: &str, filename: &str, mime: &str) -> Result<PathBuf, CoreError>;
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CoreError>;
}

/// Tries `primary` first and only reports failure when `fallback` fails too.
pub struct FallbackClipboard<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Clipboard, F: Clipboard> FallbackClipboard<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Clipboard, F: Clipboard> Clipboard for FallbackClipboard<P, F> {
    fn write_text(&mut self, text: &str) -> Result<(), CoreError> {
        match self.primary.write_text(text) {
            Ok(()) => Ok(()),
            Err(primary_err) => {
                tracing::warn!(error = %primary_err, "primary clipboard failed; using fallback");
                self.fallback.write_text(text)
            }
        }
    }
}

/// In-process field store seeded with the declared required flags.
#[derive(Debug, Clone)]
pub struct MemoryFieldStore {
    values: FormRecord,
    required: BTreeSet<FieldKey>,
    invalid: BTreeSet<FieldKey>,
    focused: Option<FieldKey>,
}

impl Default for MemoryFieldStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFieldStore {
    pub fn new() -> Self {
        Self {
            values: FormRecord::new(),
            required: FieldKey::ALL
                .iter()
                .copied()
                .filter(|key| key.required_by_default())
                .collect(),
            invalid: BTreeSet::new(),
            focused: None,
        }
    }

    pub fn focused(&self) -> Option<FieldKey> {
        self.focused
    }

    pub fn is_invalid(&self, key: FieldKey) -> bool {
        self.invalid.contains(&key)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.invalid.iter().copied()
    }
}

impl FieldStore for MemoryFieldStore {
    fn value(&self, key: FieldKey) -> String {
        self.values.get(key).to_string()
    }

    fn set_value(&mut self, key: FieldKey, value: &str) {
        self.values.set(key, value);
    }

    fn is_required(&self, key: FieldKey) -> bool {
        self.required.contains(&key)
    }

    fn set_required(&mut self, key: FieldKey, required: bool) {
        if required {
            self.required.insert(key);
        } else {
            self.required.remove(&key);
        }
    }

    fn focus(&mut self, key: FieldKey) {
        self.focused = Some(key);
    }

    fn set_invalid(&mut self, key: FieldKey, invalid: bool) {
        if invalid {
            self.invalid.insert(key);
        } else {
            self.invalid.remove(&key);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
    fail_writes: bool,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `set` fail, for exercising write-failure paths.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        if self.fail_writes {
            return Err(CoreError::Storage(format!("write rejected for `{key}`")));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Question source backed by an already-built set.
#[derive(Debug, Clone)]
pub struct StaticQuestionSource(pub QuestionSet);

impl QuestionSource for StaticQuestionSource {
    fn fetch(&self) -> Result<QuestionSet, CoreError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub mime: String,
    pub payload: String,
}

/// Keeps exported files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryExporter {
    pub files: Vec<ExportedFile>,
}

impl FileExporter for MemoryExporter {
    fn export(&mut self, payload: &str, filename: &str, mime: &str) -> Result<PathBuf, CoreError> {
        self.files.push(ExportedFile {
            filename: filename.to_string(),
            mime: mime.to_string(),
            payload: payload.to_string(),
        });
        Ok(PathBuf::from(filename))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    fail: bool,
}

impl MemoryClipboard {
    pub fn unavailable() -> Self {
        Self {
            contents: None,
            fail: true,
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CoreError> {
        if self.fail {
            return Err(CoreError::Clipboard("clipboard unavailable".into()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_store_seeds_required_flags_from_table() {
        let store = MemoryFieldStore::new();
        assert!(store.is_required(FieldKey::Prefecture));
        assert!(store.is_required(FieldKey::ContactEmail));
        assert!(!store.is_required(FieldKey::RegionName));
        assert_eq!(store.value(FieldKey::Mission), "");
    }

    #[test]
    fn fallback_clipboard_uses_secondary_only_on_failure() {
        let mut clipboard =
            FallbackClipboard::new(MemoryClipboard::unavailable(), MemoryClipboard::default());
        clipboard.write_text("# 見出し").unwrap();
        assert_eq!(clipboard.fallback.contents.as_deref(), Some("# 見出し"));

        let mut both_down = FallbackClipboard::new(
            MemoryClipboard::unavailable(),
            MemoryClipboard::unavailable(),
        );
        assert!(matches!(
            both_down.write_text("x"),
            Err(CoreError::Clipboard(_))
        ));
    }
}
