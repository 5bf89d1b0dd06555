//! The live object collection for one (subject, predicate) pair.
//!
//! [`ObjectCollection`] writes every mutation straight through to the store
//! and reads the store on every query. [`ObjectCollection::iter`] lists the
//! object nodes when it is called, so the order and membership of one
//! enumeration are fixed at that point; each node is then decoded only as
//! the iterator reaches it.

use std::vec;

use tracing::debug;

use graphmap_core::{decode, Iri, Node, Triple, Value};
use graphmap_storage::{read_collection, read_subgraph, Subgraph, TripleStore};

use crate::error::MapError;
use crate::marshal::build_subgraph;

/// Decodes one object node, reading an anchor-rooted chain as a list.
pub(crate) fn decode_object<S: TripleStore + ?Sized>(
    store: &S,
    node: &Node,
) -> Result<Value, MapError> {
    if node.is_anchor() {
        if let Some(chain) = read_collection(store, node)? {
            return Ok(Value::List(chain.items));
        }
    }
    Ok(decode(node))
}

/// Where a value lives inside a subgraph.
enum Slot {
    Triple(usize),
    Molecule(usize),
}

/// Finds the first entry of `subgraph` holding `value`.
///
/// Molecules match by content, or by head when `value` references the head
/// anchor. Flat triples match the node itself for a node reference, and the
/// decoded object otherwise.
fn locate(subgraph: &Subgraph, value: &Value) -> Option<Slot> {
    let molecule = subgraph.molecules.iter().position(|m| match value {
        Value::List(items) => !items.is_empty() && m.items == *items,
        Value::Node(node) => m.head() == node,
        _ => false,
    });
    if let Some(i) = molecule {
        return Some(Slot::Molecule(i));
    }
    subgraph
        .triples
        .iter()
        .position(|t| match value {
            Value::Node(node) => t.object == *node || decode(&t.object) == *value,
            _ => decode(&t.object) == *value,
        })
        .map(Slot::Triple)
}

pub(crate) fn contains_value(subgraph: &Subgraph, value: &Value) -> bool {
    locate(subgraph, value).is_some()
}

/// Drops non-empty lists whose content is already stored. Flat duplicates
/// are left to the store, which suppresses them.
pub(crate) fn unstored_values(existing: &Subgraph, values: &[Value]) -> Vec<Value> {
    values
        .iter()
        .filter(|v| match v {
            Value::List(items) if !items.is_empty() => !contains_value(existing, v),
            _ => true,
        })
        .cloned()
        .collect()
}

/// Retracts the triple or molecule holding each of `values`. Returns whether
/// anything was removed.
pub(crate) fn retract_values<S: TripleStore + ?Sized>(
    store: &mut S,
    subject: &Node,
    predicate: &Iri,
    values: &[Value],
) -> Result<bool, MapError> {
    let mut current = read_subgraph(&*store, subject, predicate)?;
    let mut doomed: Vec<Triple> = Vec::new();
    for value in values {
        let value = match value {
            Value::Node(node) => Value::Node(store.copy_node(node)),
            other => other.clone(),
        };
        match locate(&current, &value) {
            Some(Slot::Molecule(i)) => {
                let molecule = current.molecules.remove(i);
                doomed.extend(molecule.triples().cloned());
            }
            Some(Slot::Triple(i)) => doomed.push(current.triples.remove(i)),
            None => {}
        }
    }
    if doomed.is_empty() {
        return Ok(false);
    }
    debug!(
        subject = %subject,
        predicate = %predicate,
        triples = doomed.len(),
        "retract values"
    );
    Ok(store.retract(&doomed)?)
}

/// A write-through view of the objects of one (subject, predicate) pair.
pub struct ObjectCollection<'a, S: TripleStore + ?Sized> {
    store: &'a mut S,
    subject: Node,
    predicate: Iri,
}

impl<'a, S: TripleStore + ?Sized> ObjectCollection<'a, S> {
    pub(crate) fn new(store: &'a mut S, subject: Node, predicate: Iri) -> Self {
        ObjectCollection {
            store,
            subject,
            predicate,
        }
    }

    pub fn subject(&self) -> &Node {
        &self.subject
    }

    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    /// Asserts one value. A non-empty list is written as one molecule.
    ///
    /// Returns `false` if the value was already present, a list counting as
    /// present when a stored list has the same content.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<bool, MapError> {
        let value = value.into();
        let existing = read_subgraph(&*self.store, &self.subject, &self.predicate)?;
        let values = unstored_values(&existing, std::slice::from_ref(&value));
        let subgraph =
            build_subgraph(&mut *self.store, &self.subject, &self.predicate, &values)?;
        let added = self.store.assert(&subgraph.all_triples())?;
        debug!(
            subject = %self.subject,
            predicate = %self.predicate,
            kind = value.kind_name(),
            added,
            "add value"
        );
        Ok(added > 0)
    }

    /// Retracts the one triple holding `value`, or the whole molecule if
    /// `value` is an ordered collection (or references its head anchor). A
    /// chain that is also referenced elsewhere keeps its backbone; only this
    /// pair's link to it goes.
    pub fn remove(&mut self, value: &Value) -> Result<bool, MapError> {
        retract_values(
            &mut *self.store,
            &self.subject,
            &self.predicate,
            std::slice::from_ref(value),
        )
    }

    /// Retracts every value, molecules included.
    pub fn clear(&mut self) -> Result<bool, MapError> {
        let current = read_subgraph(&*self.store, &self.subject, &self.predicate)?;
        if current.is_empty() {
            return Ok(false);
        }
        Ok(self.store.retract(&current.all_triples())?)
    }

    pub fn contains(&self, value: &Value) -> Result<bool, MapError> {
        let current = read_subgraph(&*self.store, &self.subject, &self.predicate)?;
        Ok(contains_value(&current, value))
    }

    /// Number of values. An ordered collection counts once.
    pub fn len(&self) -> Result<usize, MapError> {
        Ok(self.nodes()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MapError> {
        Ok(self.len()? == 0)
    }

    /// The raw object nodes, in assertion order.
    pub fn nodes(&self) -> Result<Vec<Node>, MapError> {
        Ok(self
            .store
            .triples_with_subject_predicate(&self.subject, &self.predicate)?
            .into_iter()
            .map(|t| t.object)
            .collect())
    }

    /// Iterates the values, decoding each object as it is reached.
    pub fn iter(&self) -> Result<Values<'_, S>, MapError> {
        Ok(Values {
            store: &*self.store,
            objects: self.nodes()?.into_iter(),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<Value>, MapError> {
        self.iter()?.collect()
    }
}

/// Iterator over decoded values of an [`ObjectCollection`].
pub struct Values<'c, S: TripleStore + ?Sized> {
    store: &'c S,
    objects: vec::IntoIter<Node>,
}

impl<S: TripleStore + ?Sized> Iterator for Values<'_, S> {
    type Item = Result<Value, MapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.objects.next()?;
        Some(decode_object(self.store, &node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.objects.size_hint()
    }
}
