//! Entity records stored as one YAML document per entity.
//!
//! Records keep the parsed YAML mapping as-is, so keys of any type and the
//! original field order survive a save. New fields are appended at the end.
//! Reference fields are read and written through a JSON view.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sdd_config::SddConfig;
use sdd_core::EntityType;
use serde_yaml::{Mapping, Value};

use crate::error::StoreError;

const ID_FIELD: &str = "id";

/// A single entity document and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    path: PathBuf,
    id: Option<String>,
    fields: Mapping,
}

impl Record {
    /// Wrap a parsed document. The id is taken from a non-empty string `id`.
    #[must_use]
    pub fn from_fields(path: impl Into<PathBuf>, fields: Mapping) -> Self {
        let id = fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self {
            path: path.into(),
            id,
            fields,
        }
    }

    /// Parse YAML text. Empty documents and non-mappings yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Yaml` if the text is not valid YAML.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Option<Self>, StoreError> {
        let path = path.into();
        if content.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_yaml::from_str(content).map_err(|source| StoreError::Yaml {
            path: path.clone(),
            source,
        })?;

        match value {
            Value::Mapping(fields) => Ok(Some(Self::from_fields(path, fields))),
            _ => Ok(None),
        }
    }

    /// The record id, if the document has a usable one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Id, or the file stem for documents without one.
    #[must_use]
    pub fn label(&self) -> &str {
        self.id
            .as_deref()
            .or_else(|| self.path.file_stem().and_then(|stem| stem.to_str()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A field converted to JSON.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Field` if the value has no JSON form, for example
    /// a mapping keyed by lists.
    pub fn get_json(&self, field: &str) -> Result<Option<serde_json::Value>, StoreError> {
        self.fields
            .get(field)
            .map(|value| {
                serde_json::to_value(value).map_err(|source| StoreError::Field {
                    path: self.path.clone(),
                    field: field.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Set a field from JSON, appending it after existing fields when new.
    ///
    /// Writes to `id` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Yaml` if the value cannot be represented in YAML.
    pub fn set_json(&mut self, field: &str, value: &serde_json::Value) -> Result<(), StoreError> {
        if field == ID_FIELD {
            return Ok(());
        }
        let value = serde_yaml::to_value(value).map_err(|source| StoreError::Yaml {
            path: self.path.clone(),
            source,
        })?;
        self.fields.insert(Value::String(field.to_string()), value);
        Ok(())
    }

    /// Remove a field, keeping the order of the remaining ones.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        if field == ID_FIELD {
            return None;
        }
        self.fields.shift_remove(field)
    }

    /// Drop every field except `id` whose key fails `keep`.
    ///
    /// Non-string keys are matched by their YAML text. Returns the dropped
    /// keys in document order.
    pub fn retain_fields(&mut self, mut keep: impl FnMut(&str) -> bool) -> Vec<String> {
        let mut dropped = Vec::new();
        self.fields.retain(|key, _| {
            let name = key_text(key);
            if name == ID_FIELD || keep(&name) {
                return true;
            }
            dropped.push(name);
            false
        });
        dropped
    }

    /// Render the record as block-style YAML.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Yaml` if a value cannot be represented in YAML.
    pub fn to_yaml(&self) -> Result<String, StoreError> {
        serde_yaml::to_string(&self.fields).map_err(|source| StoreError::Yaml {
            path: self.path.clone(),
            source,
        })
    }
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Loads and saves entity records grouped by type folder.
#[derive(Debug, Clone)]
pub struct EntityStore {
    root: PathBuf,
}

impl EntityStore {
    /// Store rooted at the configured entities directory.
    #[must_use]
    pub fn new(config: &SddConfig) -> Self {
        Self::from_root(config.entities_root())
    }

    #[must_use]
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding records of `entity`.
    #[must_use]
    pub fn folder(&self, entity: EntityType) -> PathBuf {
        self.root.join(entity.folder())
    }

    /// Load every record of a type, keyed by id.
    ///
    /// A missing folder yields an empty map. Files are read in name order;
    /// documents without an id are skipped. If two files share an id the
    /// later one wins and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the folder cannot be listed or a file cannot
    /// be read or parsed.
    pub fn load_all(&self, entity: EntityType) -> Result<BTreeMap<String, Record>, StoreError> {
        let mut records = BTreeMap::new();

        for record in self.documents(entity)? {
            let Some(id) = record.id().map(str::to_string) else {
                tracing::debug!(path = %record.path().display(), "skipping document without id");
                continue;
            };

            if let Some(previous) = records.get(&id).map(|r: &Record| r.path.clone()) {
                tracing::warn!(
                    id = %id,
                    kept = %record.path().display(),
                    dropped = %previous.display(),
                    "duplicate {} id",
                    entity
                );
            }
            records.insert(id, record);
        }

        Ok(records)
    }

    /// Every non-empty mapping document of a type, with or without an id, in
    /// file name order.
    ///
    /// # Errors
    ///
    /// Same as [`EntityStore::load_all`].
    pub fn documents(&self, entity: EntityType) -> Result<Vec<Record>, StoreError> {
        let mut records = Vec::new();
        for path in self.record_paths(entity)? {
            if let Some(record) = Self::load_file(&path)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Resolve a single record by id within a type's folder.
    ///
    /// # Errors
    ///
    /// Same as [`EntityStore::load_all`].
    pub fn get(&self, entity: EntityType, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.load_all(entity)?.remove(id))
    }

    /// Parse one record file. Empty documents and non-mappings yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file cannot be read or is not valid YAML.
    pub fn load_file(path: &Path) -> Result<Option<Record>, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Record::parse(path, &content)
    }

    /// Write a record back to the file it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if rendering or writing fails.
    pub fn save(&self, record: &Record) -> Result<(), StoreError> {
        let rendered = record.to_yaml()?;
        fs::write(record.path(), rendered).map_err(|e| StoreError::io(record.path(), e))?;
        tracing::debug!(path = %record.path().display(), "saved entity");
        Ok(())
    }

    fn record_paths(&self, entity: EntityType) -> Result<Vec<PathBuf>, StoreError> {
        let folder = self.folder(entity);
        if !folder.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&folder).map_err(|e| StoreError::io(&folder, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&folder, e))?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}
