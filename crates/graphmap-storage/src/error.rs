//! Storage error types for graphmap-storage.
//!
//! [`StorageError`] covers integrity violations detected before a write
//! and encoding failures while building collection molecules.

use graphmap_core::CoreError;
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A triple would violate a store invariant (literal subject, foreign anchor).
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },

    /// A value could not be encoded while building a molecule.
    #[error("encoding error: {0}")]
    Encoding(#[from] CoreError),
}
