//! In-memory implementation of [`TripleStore`].
//!
//! [`InMemoryStore`] keeps triples grouped by subject in insertion-ordered
//! maps, so every lookup returns triples in the order they were asserted.
//! It is the backend used by tests and by any caller that does not need
//! persistence.

use std::collections::HashMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use graphmap_core::{AnchorId, Iri, Node, NodeContext, StoreId, Triple};

use crate::error::StorageError;
use crate::traits::TripleStore;

/// In-memory triple store backed by ordered maps.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    id: StoreId,
    /// Outgoing (predicate, object) pairs per subject, in assertion order.
    subjects: IndexMap<Node, IndexSet<(Iri, Node)>>,
    /// Incoming (subject, predicate) pairs per object, in assertion order.
    objects: IndexMap<Node, IndexSet<(Node, Iri)>>,
    len: usize,
    next_anchor: u64,
    /// Foreign anchor -> local anchor, so repeated copies agree.
    imported: HashMap<AnchorId, AnchorId>,
}

impl InMemoryStore {
    /// Creates an empty store with a fresh identity.
    pub fn new() -> Self {
        InMemoryStore {
            id: StoreId::random(),
            subjects: IndexMap::new(),
            objects: IndexMap::new(),
            len: 0,
            next_anchor: 0,
            imported: HashMap::new(),
        }
    }

    /// Creates a store pre-populated with `triples`.
    pub fn from_triples(triples: &[Triple]) -> Result<Self, StorageError> {
        let mut store = Self::new();
        store.assert(triples)?;
        Ok(store)
    }

    /// Checks one triple against the store invariants.
    fn validate(&self, triple: &Triple) -> Result<(), StorageError> {
        if triple.subject.is_literal() {
            return Err(StorageError::IntegrityError {
                reason: format!("literal subject {} in {}", triple.subject, triple),
            });
        }
        for node in [&triple.subject, &triple.object] {
            if let Some(anchor) = node.as_anchor() {
                if anchor.store != self.id {
                    return Err(StorageError::IntegrityError {
                        reason: format!(
                            "anchor {} belongs to another store; copy it before asserting",
                            anchor
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    fn allocate(&mut self) -> AnchorId {
        let anchor = AnchorId {
            store: self.id,
            index: self.next_anchor,
        };
        self.next_anchor += 1;
        anchor
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeContext for InMemoryStore {
    fn copy_node(&mut self, node: &Node) -> Node {
        match node.as_anchor() {
            Some(anchor) if anchor.store != self.id => {
                if let Some(local) = self.imported.get(&anchor) {
                    return Node::Anchor(*local);
                }
                let local = self.allocate();
                self.imported.insert(anchor, local);
                Node::Anchor(local)
            }
            _ => node.clone(),
        }
    }
}

impl TripleStore for InMemoryStore {
    fn store_id(&self) -> StoreId {
        self.id
    }

    fn assert(&mut self, triples: &[Triple]) -> Result<usize, StorageError> {
        for triple in triples {
            self.validate(triple)?;
        }

        let mut added = 0;
        for triple in triples {
            let outgoing = self.subjects.entry(triple.subject.clone()).or_default();
            if outgoing.insert((triple.predicate.clone(), triple.object.clone())) {
                trace!(%triple, "assert");
                self.objects
                    .entry(triple.object.clone())
                    .or_default()
                    .insert((triple.subject.clone(), triple.predicate.clone()));
                added += 1;
            }
        }
        self.len += added;
        Ok(added)
    }

    fn retract(&mut self, triples: &[Triple]) -> Result<bool, StorageError> {
        let mut removed = false;
        for triple in triples {
            let Some(outgoing) = self.subjects.get_mut(&triple.subject) else {
                continue;
            };
            if !outgoing.shift_remove(&(triple.predicate.clone(), triple.object.clone())) {
                continue;
            }
            trace!(%triple, "retract");
            self.len -= 1;
            removed = true;
            if outgoing.is_empty() {
                self.subjects.shift_remove(&triple.subject);
            }
            if let Some(incoming) = self.objects.get_mut(&triple.object) {
                incoming.shift_remove(&(triple.subject.clone(), triple.predicate.clone()));
                if incoming.is_empty() {
                    self.objects.shift_remove(&triple.object);
                }
            }
        }
        Ok(removed)
    }

    fn triples_with_subject(&self, subject: &Node) -> Result<Vec<Triple>, StorageError> {
        Ok(self
            .subjects
            .get(subject)
            .map(|outgoing| {
                outgoing
                    .iter()
                    .map(|(p, o)| Triple::new(subject.clone(), p.clone(), o.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn triples_with_subject_predicate(
        &self,
        subject: &Node,
        predicate: &Iri,
    ) -> Result<Vec<Triple>, StorageError> {
        Ok(self
            .subjects
            .get(subject)
            .map(|outgoing| {
                outgoing
                    .iter()
                    .filter(|(p, _)| p == predicate)
                    .map(|(p, o)| Triple::new(subject.clone(), p.clone(), o.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn triples_with_object(&self, object: &Node) -> Result<Vec<Triple>, StorageError> {
        Ok(self
            .objects
            .get(object)
            .map(|incoming| {
                incoming
                    .iter()
                    .map(|(s, p)| Triple::new(s.clone(), p.clone(), object.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn triples(&self) -> Result<Vec<Triple>, StorageError> {
        Ok(self
            .subjects
            .iter()
            .flat_map(|(s, outgoing)| {
                outgoing
                    .iter()
                    .map(move |(p, o)| Triple::new(s.clone(), p.clone(), o.clone()))
            })
            .collect())
    }

    fn fresh_anchor(&mut self) -> Node {
        Node::Anchor(self.allocate())
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Dumps the store as N-Triples, one triple per line.
impl fmt::Display for InMemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (s, outgoing) in &self.subjects {
            for (p, o) in outgoing {
                if !first {
                    writeln!(f)?;
                }
                first = false;
                write!(f, "{} {} {} .", s, p, o)?;
            }
        }
        Ok(())
    }
}
