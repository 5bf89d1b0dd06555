//! Core error types for graphmap-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! key resolution and value encoding failures.

use thiserror::Error;

/// Core errors produced by the graphmap-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A predicate or subject key was absent, empty, or not usable in its position.
    #[error("invalid key: {reason}")]
    InvalidKey { reason: String },

    /// A short name was used but no base namespace is configured.
    #[error("short name '{name}' used without a base namespace")]
    NoBaseNamespace { name: String },

    /// The value kind has no literal or node mapping.
    #[error("unsupported value kind: {kind}")]
    UnsupportedValueKind { kind: &'static str },

    /// The value has the right kind but no lexical form that reads back unchanged.
    #[error("cannot encode {kind} value {value}: {reason}")]
    UnrepresentableValue {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A string could not be turned into an absolute identifier.
    #[error("invalid IRI '{iri}': {reason}")]
    InvalidIri { iri: String, reason: String },
}
