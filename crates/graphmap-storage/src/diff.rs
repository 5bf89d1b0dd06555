//! Molecule-aware differencing of a (subject, predicate) subgraph.
//!
//! A [`Subgraph`] splits the values of one predicate into flat triples and
//! ordered-collection [`Molecule`]s. [`compute_diff`] compares an existing
//! subgraph against a desired one:
//!
//! - Flat triples are compared structurally. A triple present on both sides
//!   is left alone.
//! - Molecules carry fresh anchors every time they are built, so they are
//!   compared by decoded item content instead. Molecules are paired by
//!   position; an unequal pair is reported as a full removal plus a full
//!   addition, and unpaired leftovers as pure removals or additions.
//! - A desired flat triple that is exactly an existing molecule's link (a
//!   reference to the stored head) keeps that molecule as it is.
//!
//! A molecule whose chain is also reachable from elsewhere is not owned by
//! its link triple. Removing it retracts only the link and leaves the chain
//! to its other referrers.

use indexmap::IndexSet;
use tracing::warn;

use graphmap_core::{Iri, Node, Triple, Value};

use crate::collection::{is_exclusive, looks_like_link, read_collection};
use crate::error::StorageError;
use crate::traits::TripleStore;

/// A closed group of triples added and removed as a unit: the link from the
/// subject to a collection head plus the whole collection chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    /// The `(subject, predicate, head)` triple.
    pub link: Triple,
    /// Chain triples, nested collections included.
    pub chain: Vec<Triple>,
    /// Decoded items, used for content comparison.
    pub items: Vec<Value>,
    /// False when another triple also reaches the chain.
    pub owned: bool,
}

impl Molecule {
    pub fn head(&self) -> &Node {
        &self.link.object
    }

    /// The link triple followed by the chain triples, or just the link if
    /// the chain is shared.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        let chain: &[Triple] = if self.owned { &self.chain } else { &[] };
        std::iter::once(&self.link).chain(chain.iter())
    }

    /// True if both molecules hold equal items in the same order.
    pub fn same_content(&self, other: &Molecule) -> bool {
        self.items == other.items
    }
}

/// The values of one (subject, predicate) pair, split by shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subgraph {
    pub triples: Vec<Triple>,
    pub molecules: Vec<Molecule>,
}

impl Subgraph {
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty() && self.molecules.is_empty()
    }

    /// Number of values: one per flat triple and one per molecule.
    pub fn value_count(&self) -> usize {
        self.triples.len() + self.molecules.len()
    }

    /// Every triple, flat triples first.
    pub fn all_triples(&self) -> Vec<Triple> {
        let mut all = self.triples.clone();
        for molecule in &self.molecules {
            all.extend(molecule.triples().cloned());
        }
        all
    }
}

/// Reads the current (subject, predicate) subgraph from `store`.
///
/// An object that heads a well-formed collection becomes a molecule, owned
/// only if nothing else reaches its links. Every other object, a malformed
/// collection head included, is a flat triple.
pub fn read_subgraph<S: TripleStore + ?Sized>(
    store: &S,
    subject: &Node,
    predicate: &Iri,
) -> Result<Subgraph, StorageError> {
    let mut subgraph = Subgraph::default();
    for triple in store.triples_with_subject_predicate(subject, predicate)? {
        if triple.object.is_anchor() {
            if let Some(chain) = read_collection(store, &triple.object)? {
                let owned = is_exclusive(store, &chain)?;
                subgraph.molecules.push(Molecule {
                    link: triple,
                    chain: chain.triples,
                    items: chain.items,
                    owned,
                });
                continue;
            }
            if looks_like_link(store, &triple.object)? {
                warn!(
                    subject = %subject,
                    predicate = %predicate,
                    head = %triple.object,
                    "malformed ordered collection, treating head as a plain reference"
                );
            }
        }
        subgraph.triples.push(triple);
    }
    Ok(subgraph)
}

/// The changes needed to turn one subgraph into another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffReport {
    pub added_triples: Vec<Triple>,
    pub removed_triples: Vec<Triple>,
    pub added_molecules: Vec<Molecule>,
    pub removed_molecules: Vec<Molecule>,
}

impl DiffReport {
    /// Returns true if the two sides were equal.
    pub fn is_empty(&self) -> bool {
        self.added_triples.is_empty()
            && self.removed_triples.is_empty()
            && self.added_molecules.is_empty()
            && self.removed_molecules.is_empty()
    }

    /// Total count of changed values (triples + molecules, both directions).
    pub fn total(&self) -> usize {
        self.added_triples.len()
            + self.removed_triples.len()
            + self.added_molecules.len()
            + self.removed_molecules.len()
    }

    /// Triples to retract: removed molecules first, then flat triples.
    pub fn retractions(&self) -> Vec<Triple> {
        let mut out: Vec<Triple> = self
            .removed_molecules
            .iter()
            .flat_map(|m| m.triples().cloned())
            .collect();
        out.extend(self.removed_triples.iter().cloned());
        out
    }

    /// Triples to assert: flat triples first, then added molecules.
    pub fn assertions(&self) -> Vec<Triple> {
        let mut out = self.added_triples.clone();
        out.extend(
            self.added_molecules
                .iter()
                .flat_map(|m| m.triples().cloned()),
        );
        out
    }
}

/// Computes the delta that turns `existing` into `desired`.
pub fn compute_diff(existing: &Subgraph, desired: &Subgraph) -> DiffReport {
    let existing_flat: IndexSet<&Triple> = existing.triples.iter().collect();
    let desired_flat: IndexSet<&Triple> = desired.triples.iter().collect();

    let (kept, unmatched): (Vec<&Molecule>, Vec<&Molecule>) = existing
        .molecules
        .iter()
        .partition(|m| desired_flat.contains(&m.link));
    let kept_links: IndexSet<&Triple> = kept.iter().map(|m| &m.link).collect();

    let removed_triples = existing_flat
        .iter()
        .filter(|t| !desired_flat.contains(*t))
        .map(|t| (*t).clone())
        .collect();
    let added_triples = desired_flat
        .iter()
        .filter(|t| !existing_flat.contains(*t) && !kept_links.contains(*t))
        .map(|t| (*t).clone())
        .collect();

    let mut added_molecules = Vec::new();
    let mut removed_molecules = Vec::new();
    let pairs = unmatched.len().max(desired.molecules.len());
    for i in 0..pairs {
        match (unmatched.get(i), desired.molecules.get(i)) {
            (Some(old), Some(new)) if old.same_content(new) => {}
            (Some(old), Some(new)) => {
                removed_molecules.push((*old).clone());
                added_molecules.push(new.clone());
            }
            (Some(old), None) => removed_molecules.push((*old).clone()),
            (None, Some(new)) => added_molecules.push(new.clone()),
            (None, None) => {}
        }
    }

    DiffReport {
        added_triples,
        removed_triples,
        added_molecules,
        removed_molecules,
    }
}
