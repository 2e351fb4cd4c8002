//! # sdd-store
//!
//! File-backed stores for a bundle:
//! - [`EntityStore`]: one YAML document per entity under `<entities>/<folder>/`
//! - [`SchemaStore`]: one JSON Schema per entity type under `<schemas>/<Type>.schema.json`
//!
//! Neither store caches. Every `load*` call reads the filesystem, so callers
//! always observe the effects of earlier saves.

pub mod entity;
pub mod error;
pub mod schema;

pub use entity::{EntityStore, Record};
pub use error::StoreError;
pub use schema::{SchemaDoc, SchemaStore};
