//! Filesystem-backed implementations of the wizard's storage surfaces.
//!
//! Every write goes to a sibling `*.tmp` file first and is renamed into place.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use recruit_core::{CoreError, FileExporter, KeyValueStore, QuestionSource};
use recruit_domain::QuestionSet;

const ENTRY_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Durable key-value store keeping one JSON file per key.
#[derive(Debug, Clone)]
pub struct JsonKeyValueStore {
    dir: PathBuf,
}

impl JsonKeyValueStore {
    pub fn new(dir: PathBuf) -> Result<Self, CoreError> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", canonical_name(key), ENTRY_EXTENSION))
    }
}

impl KeyValueStore for JsonKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, path = %path.display(), "entry written");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CoreError> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Writes exported payloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileExporter for DirectoryExporter {
    fn export(&mut self, payload: &str, filename: &str, mime: &str) -> Result<PathBuf, CoreError> {
        if filename.contains(['/', '\\']) || filename.trim().is_empty() {
            return Err(CoreError::Storage(format!(
                "refusing to export to `{filename}`"
            )));
        }
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, payload)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), mime, "payload exported");
        Ok(path)
    }
}

/// Reads a question document from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for FileQuestionSource {
    fn fetch(&self) -> Result<QuestionSet, CoreError> {
        let text = fs::read_to_string(&self.path)?;
        Ok(QuestionSet::from_json(&text)?)
    }
}

/// Reads a user-selected draft file as text.
pub fn read_import_file(path: &Path) -> Result<String, CoreError> {
    Ok(fs::read_to_string(path)?)
}

fn canonical_name(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "entry".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
