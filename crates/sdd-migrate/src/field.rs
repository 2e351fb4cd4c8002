//! Reference-field synthesis.
//!
//! Produces the schema property added to a target type when a relationship
//! moves onto it.

use sdd_core::{Cardinality, EntityType};
use serde_json::{Value, json};

/// Schema `format` marking a string as an entity reference.
pub const REF_FORMAT: &str = "sdd-ref";

/// Maximum length of a single-valued reference id.
pub const SINGLE_REF_MAX_LENGTH: u64 = 30;

/// Property definition for a reference to entities of `source`.
///
/// Many-valued references are arrays with `uniqueItems` and no length cap;
/// single-valued references are bounded strings.
#[must_use]
pub fn reference_field(source: EntityType, cardinality: Cardinality) -> Value {
    let reference = json!({
        "type": "string",
        "format": REF_FORMAT,
        "x-sdd-refTargets": [source.as_str()],
    });

    match cardinality {
        Cardinality::Many => json!({
            "type": "array",
            "items": reference,
            "uniqueItems": true,
        }),
        Cardinality::Single => {
            let mut single = reference;
            if let Value::Object(map) = &mut single {
                map.insert("maxLength".to_string(), json!(SINGLE_REF_MAX_LENGTH));
            }
            single
        }
    }
}

/// Human title from a camelCase field name.
///
/// Drops one trailing `Ids`/`Id`, splits before each uppercase letter and
/// lowercases: `realizedByRequirementIds` becomes `realized by requirement`.
#[must_use]
pub fn field_title(field: &str) -> String {
    let stem = field
        .strip_suffix("Ids")
        .or_else(|| field.strip_suffix("Id"))
        .unwrap_or(field);

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for ch in stem.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current).to_lowercase());
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current.to_lowercase());
    }
    words.join(" ")
}

/// Generated description for a back-reference field.
#[must_use]
pub fn field_description(source: EntityType) -> String {
    format!("{source}s that affect/apply to this entity")
}

/// Full property definition: synthesized shape plus description and title.
#[must_use]
pub fn back_reference_field(source: EntityType, cardinality: Cardinality, field: &str) -> Value {
    let mut definition = reference_field(source, cardinality);
    if let Value::Object(map) = &mut definition {
        map.insert(
            "description".to_string(),
            Value::String(field_description(source)),
        );
        map.insert("title".to_string(), Value::String(field_title(field)));
    }
    definition
}
