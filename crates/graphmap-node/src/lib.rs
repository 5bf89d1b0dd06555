//! Property-map view over a subject in a triple store.
//!
//! [`NodeMap`] maps each predicate of one subject to its object values,
//! converting between native [`Value`]s and graph nodes on the way in and
//! out. [`ObjectCollection`] is the write-through handle for a single
//! predicate.
//!
//! ```no_run
//! use graphmap_core::Value;
//! use graphmap_node::{MapConfig, NodeMap};
//! use graphmap_storage::InMemoryStore;
//!
//! # fn main() -> Result<(), graphmap_node::MapError> {
//! let mut store = InMemoryStore::new();
//! let mut map = NodeMap::new(&mut store, "urn:s", &MapConfig::default())?;
//! map.set("urn:tags", vec!["a", "b"])?;
//! map.set("urn:order", Value::list([1, 2, 3]))?;
//! assert_eq!(map.values("urn:order")?, vec![Value::list([1, 2, 3])]);
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod map;
pub mod marshal;

pub use collection::{ObjectCollection, Values};
pub use config::MapConfig;
pub use error::MapError;
pub use map::NodeMap;
pub use marshal::{expand, Expansion, Mode, Objects};

pub use graphmap_core::Value;
