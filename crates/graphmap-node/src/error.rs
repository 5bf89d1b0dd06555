//! Error types for the property-map layer.
//!
//! [`MapError`] wraps the lower crates' errors and adds the failures that
//! only make sense at the map level.

use graphmap_core::{CoreError, Iri};
use graphmap_storage::StorageError;
use thiserror::Error;

/// Errors produced by [`NodeMap`](crate::NodeMap) and
/// [`ObjectCollection`](crate::ObjectCollection) operations.
#[derive(Debug, Error)]
pub enum MapError {
    /// Key resolution or value encoding failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The underlying store rejected an operation.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// `add` was called with an input that expands to no values.
    #[error("no values given to add for {predicate}")]
    MissingValue { predicate: Iri },

    /// A predicate that must have values has none.
    #[error("no values for {predicate}")]
    KeyNotFound { predicate: Iri },

    /// The configuration document could not be parsed.
    #[error("invalid map configuration: {0}")]
    Config(#[from] serde_json::Error),
}
