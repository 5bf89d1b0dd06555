//! The [`TripleStore`] trait defining the store contract.
//!
//! The trait covers exactly what the property-map layer consumes: ordered,
//! duplicate-suppressing assert/retract, the subject-rooted lookups, the
//! object lookup used to decide who owns a collection chain, anchor
//! allocation, and node copying (via the [`NodeContext`] supertrait).
//!
//! The trait is synchronous and takes slices so it stays object safe;
//! `&mut dyn TripleStore` works wherever a generic store does.

use graphmap_core::{Iri, Node, NodeContext, StoreId, Triple};

use crate::error::StorageError;

/// The contract for a mutable, ordered triple store.
pub trait TripleStore: NodeContext {
    /// Identity of this store; carried by every anchor it allocates.
    fn store_id(&self) -> StoreId;

    /// Adds triples, ignoring ones already present.
    ///
    /// Returns the number of triples that were new. Every triple is validated
    /// before any is inserted, so an error leaves the store unchanged.
    fn assert(&mut self, triples: &[Triple]) -> Result<usize, StorageError>;

    /// Removes triples. Returns `true` if at least one was present.
    fn retract(&mut self, triples: &[Triple]) -> Result<bool, StorageError>;

    /// All triples with the given subject, in assertion order.
    fn triples_with_subject(&self, subject: &Node) -> Result<Vec<Triple>, StorageError>;

    /// All triples with the given subject and predicate, in assertion order.
    fn triples_with_subject_predicate(
        &self,
        subject: &Node,
        predicate: &Iri,
    ) -> Result<Vec<Triple>, StorageError>;

    /// All triples with the given object, in assertion order.
    fn triples_with_object(&self, object: &Node) -> Result<Vec<Triple>, StorageError>;

    /// Every triple in the store.
    fn triples(&self) -> Result<Vec<Triple>, StorageError>;

    /// Allocates an anchor node that has never been handed out before.
    fn fresh_anchor(&mut self) -> Node;

    /// Number of triples in the store.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
