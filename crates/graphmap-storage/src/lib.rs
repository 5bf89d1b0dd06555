//! Storage abstraction for graphmap triple stores.
//!
//! Provides the [`TripleStore`] trait defining the store contract the
//! property-map layer consumes, the [`InMemoryStore`] backend, and the
//! molecule-aware differ used to replace a predicate's values.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: TripleStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`collection`]: reading and building anchor-rooted ordered collections
//! - [`diff`]: Subgraph, Molecule, DiffReport and the differ

pub mod collection;
pub mod diff;
pub mod error;
pub mod memory;
pub mod traits;

// Re-export key types for ergonomic use.
pub use collection::{build_collection, is_exclusive, read_collection, Chain};
pub use diff::{compute_diff, read_subgraph, DiffReport, Molecule, Subgraph};
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use traits::TripleStore;
