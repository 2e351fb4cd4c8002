//! Per-type JSON Schema documents.
//!
//! Only the `properties` map is interpreted. Every other key is carried
//! through untouched, in its original order.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use sdd_config::SddConfig;
use sdd_core::EntityType;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// A loaded schema document for one entity type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDoc {
    entity: EntityType,
    path: PathBuf,
    doc: Map<String, Value>,
}

impl SchemaDoc {
    /// Wrap a parsed document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidDocument` if `properties` is present but
    /// not an object.
    pub fn new(
        entity: EntityType,
        path: impl Into<PathBuf>,
        doc: Map<String, Value>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if doc.get("properties").is_some_and(|p| !p.is_object()) {
            return Err(StoreError::InvalidDocument {
                path,
                reason: "'properties' is not an object".to_string(),
            });
        }
        Ok(Self { entity, path, doc })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `properties` map, if declared.
    #[must_use]
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.doc.get("properties").and_then(Value::as_object)
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.properties().is_some_and(|p| p.contains_key(name))
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties().and_then(|p| p.get(name))
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.doc
            .get_mut("properties")
            .and_then(Value::as_object_mut)
            .and_then(|p| p.get_mut(name))
    }

    /// Declared property names.
    #[must_use]
    pub fn field_names(&self) -> BTreeSet<String> {
        self.properties()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Add or replace a property, creating `properties` if absent.
    pub fn insert_property(&mut self, name: &str, definition: Value) {
        let properties = self
            .doc
            .entry("properties")
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = properties {
            map.insert(name.to_string(), definition);
        }
    }

    /// Remove a property, keeping the order of the remaining ones.
    pub fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.doc
            .get_mut("properties")
            .and_then(Value::as_object_mut)
            .and_then(|p| p.shift_remove(name))
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Json` if serialization fails.
    pub fn render(&self) -> Result<String, StoreError> {
        let mut rendered =
            serde_json::to_string_pretty(&self.doc).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        rendered.push('\n');
        Ok(rendered)
    }
}

/// Loads and saves `<Type>.schema.json` documents.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    root: PathBuf,
}

impl SchemaStore {
    /// Store rooted at the configured schemas directory.
    #[must_use]
    pub fn new(config: &SddConfig) -> Self {
        Self::from_root(config.schemas_root())
    }

    #[must_use]
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Schema file path for a type.
    #[must_use]
    pub fn path(&self, entity: EntityType) -> PathBuf {
        self.root.join(format!("{entity}.schema.json"))
    }

    /// Load a type's schema. A missing file yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the file exists but cannot be read, is not
    /// valid JSON, or is not a JSON object.
    pub fn load(&self, entity: EntityType) -> Result<Option<SchemaDoc>, StoreError> {
        let path = self.path(entity);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let value: Value = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        match value {
            Value::Object(doc) => SchemaDoc::new(entity, path, doc).map(Some),
            _ => Err(StoreError::InvalidDocument {
                path,
                reason: "schema root is not an object".to_string(),
            }),
        }
    }

    /// Persist a schema to its file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if rendering or writing fails.
    pub fn save(&self, schema: &SchemaDoc) -> Result<(), StoreError> {
        let rendered = schema.render()?;
        fs::write(schema.path(), rendered).map_err(|e| StoreError::io(schema.path(), e))?;
        tracing::debug!(entity = %schema.entity, path = %schema.path().display(), "saved schema");
        Ok(())
    }

    /// Property names currently declared for a type; empty if there is no schema.
    ///
    /// # Errors
    ///
    /// Same as [`SchemaStore::load`].
    pub fn field_names(&self, entity: EntityType) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .load(entity)?
            .as_ref()
            .map(SchemaDoc::field_names)
            .unwrap_or_default())
    }
}
