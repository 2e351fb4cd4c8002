//! Shared bundle fixtures for sdd-migrate integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sdd_config::SddConfig;
use sdd_core::EntityType;
use sdd_migrate::{Cleanup, Driver, Migrator};
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway bundle laid out like the real one: `schemas/` and `bundle/<folder>/`.
pub struct Bundle {
    dir: TempDir,
    config: SddConfig,
}

impl Bundle {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let config = SddConfig::for_bundle(dir.path());
        fs::create_dir_all(config.schemas_root()).unwrap();
        fs::create_dir_all(config.entities_root()).unwrap();
        Self { dir, config }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub const fn config(&self) -> &SddConfig {
        &self.config
    }

    pub fn migrator(&self) -> Migrator {
        Migrator::new(&self.config)
    }

    pub fn driver(&self) -> Driver {
        Driver::new(self.migrator())
    }

    pub fn cleanup(&self) -> Cleanup {
        Cleanup::new(&self.config)
    }

    pub fn schema_path(&self, entity: EntityType) -> PathBuf {
        self.config
            .schemas_root()
            .join(format!("{entity}.schema.json"))
    }

    /// Write a schema whose `properties` declares each of `fields` as a string.
    pub fn schema(&self, entity: EntityType, fields: &[&str]) -> &Self {
        let properties: serde_json::Map<String, Value> = fields
            .iter()
            .map(|f| ((*f).to_string(), serde_json::json!({"type": "string"})))
            .collect();
        let doc = serde_json::json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": entity.as_str(),
            "type": "object",
            "properties": properties,
        });
        let mut rendered = serde_json::to_string_pretty(&doc).unwrap();
        rendered.push('\n');
        fs::write(self.schema_path(entity), rendered).unwrap();
        self
    }

    pub fn raw_schema(&self, entity: EntityType, content: &str) -> &Self {
        fs::write(self.schema_path(entity), content).unwrap();
        self
    }

    pub fn record_path(&self, entity: EntityType, id: &str) -> PathBuf {
        self.config
            .entities_root()
            .join(entity.folder())
            .join(format!("{}.yaml", id.to_lowercase()))
    }

    /// Write a record file named after its id.
    pub fn record(&self, entity: EntityType, id: &str, body: &str) -> &Self {
        let path = self.record_path(entity, id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("id: {id}\n{body}")).unwrap();
        self
    }

    pub fn load_schema(&self, entity: EntityType) -> Value {
        serde_json::from_str(&fs::read_to_string(self.schema_path(entity)).unwrap()).unwrap()
    }

    pub fn property(&self, entity: EntityType, field: &str) -> Option<Value> {
        self.load_schema(entity)["properties"].get(field).cloned()
    }

    pub fn load_record(&self, entity: EntityType, id: &str) -> Value {
        serde_yaml::from_str(&fs::read_to_string(self.record_path(entity, id)).unwrap()).unwrap()
    }

    pub fn field(&self, entity: EntityType, id: &str, field: &str) -> Option<Value> {
        self.load_record(entity, id).get(field).cloned()
    }

    /// Every file under the bundle with its exact bytes.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), &mut files);
        files
    }
}

fn collect(dir: &Path, files: &mut BTreeMap<PathBuf, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(&path, files);
        } else {
            files.insert(path.clone(), fs::read(&path).unwrap());
        }
    }
}
