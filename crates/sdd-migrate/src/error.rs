//! Migration error types.

use sdd_store::StoreError;
use thiserror::Error;

/// Errors that abort a single rule or cleanup unit.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Reading or writing a bundle file failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A record field does not have a shape the migration can work with.
    #[error("{entity} {id}: field '{field}' {reason}")]
    Structural {
        entity: String,
        id: String,
        field: String,
        reason: String,
    },
}

/// Render an error and all of its sources as `outer: inner: root`.
#[must_use]
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.ends_with(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}
