//! Anchor-rooted ordered collections.
//!
//! A collection is a chain of anchor links. Each link has exactly one
//! `rdf:first` triple (the item) and one `rdf:rest` triple (the next link,
//! or `rdf:nil` at the end). The empty collection is `rdf:nil` itself and
//! owns no triples. An item that is itself the head of a well-formed chain
//! is a nested collection, and its triples belong to the same chain.
//!
//! Shape and ownership are separate questions. [`read_collection`] only
//! checks shape, so a chain reachable from several places still reads as a
//! list from each of them. [`is_exclusive`] decides whether one link triple
//! owns the chain: every link, nested ones included, must be referenced by
//! exactly one triple (its parent's link, `rdf:rest` or `rdf:first` edge).

use std::collections::HashSet;

use graphmap_core::vocab::rdf;
use graphmap_core::{decode, encode, AnchorId, Iri, Node, Triple, Value};

use crate::error::StorageError;
use crate::traits::TripleStore;

/// A decoded collection together with the triples that make it up.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub items: Vec<Value>,
    /// Link triples of this chain and every nested chain.
    pub triples: Vec<Triple>,
    /// Link anchors of this chain and every nested chain, head first.
    pub links: Vec<Node>,
}

/// Reads the collection headed by `head`.
///
/// Returns `Ok(None)` if `head` does not start a well-formed chain: a link
/// with missing, duplicated or extra outgoing triples, a link that is not
/// an anchor, or a chain that revisits a link.
pub fn read_collection<S: TripleStore + ?Sized>(
    store: &S,
    head: &Node,
) -> Result<Option<Chain>, StorageError> {
    let mut visited = HashSet::new();
    read_chain(store, head, &mut visited)
}

fn read_chain<S: TripleStore + ?Sized>(
    store: &S,
    head: &Node,
    visited: &mut HashSet<AnchorId>,
) -> Result<Option<Chain>, StorageError> {
    let mut items = Vec::new();
    let mut triples = Vec::new();
    let mut links = Vec::new();
    let mut current = head.clone();

    loop {
        let anchor = match &current {
            Node::Iri(iri) if iri.as_str() == rdf::NIL => break,
            Node::Anchor(anchor) => *anchor,
            _ => return Ok(None),
        };
        if !visited.insert(anchor) {
            return Ok(None);
        }

        let outgoing = store.triples_with_subject(&current)?;
        if outgoing.len() != 2 {
            return Ok(None);
        }
        let first = outgoing.iter().find(|t| t.predicate.as_str() == rdf::FIRST);
        let rest = outgoing.iter().find(|t| t.predicate.as_str() == rdf::REST);
        let (Some(first), Some(rest)) = (first, rest) else {
            return Ok(None);
        };

        links.push(current.clone());
        let item = match &first.object {
            Node::Anchor(_) => match read_chain(store, &first.object, visited)? {
                Some(nested) => {
                    triples.extend(nested.triples);
                    links.extend(nested.links);
                    Value::List(nested.items)
                }
                None => decode(&first.object),
            },
            other => decode(other),
        };
        items.push(item);
        current = rest.object.clone();
        triples.extend(outgoing);
    }

    Ok(Some(Chain {
        items,
        triples,
        links,
    }))
}

/// Returns `true` if no triple outside the chain's own backbone reaches any
/// of its links, so retracting the chain cannot strip a list from another
/// owner.
pub fn is_exclusive<S: TripleStore + ?Sized>(
    store: &S,
    chain: &Chain,
) -> Result<bool, StorageError> {
    for link in &chain.links {
        if store.triples_with_object(link)?.len() != 1 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Builds the chain for `items`, allocating fresh anchors from `store`.
///
/// Returns the head node and the triples to assert. Nothing is written to
/// the store. An empty slice yields `rdf:nil` and no triples.
pub fn build_collection<S: TripleStore + ?Sized>(
    store: &mut S,
    items: &[Value],
) -> Result<(Node, Vec<Triple>), StorageError> {
    if items.is_empty() {
        return Ok((Node::iri(rdf::NIL), Vec::new()));
    }

    let links: Vec<Node> = items.iter().map(|_| store.fresh_anchor()).collect();
    let mut triples = Vec::with_capacity(items.len() * 2);
    for (i, item) in items.iter().enumerate() {
        let object = match item {
            Value::List(nested) if !nested.is_empty() => {
                let (head, nested_triples) = build_collection(store, nested)?;
                triples.extend(nested_triples);
                head
            }
            other => encode(other, store)?,
        };
        let next = links
            .get(i + 1)
            .cloned()
            .unwrap_or_else(|| Node::iri(rdf::NIL));
        triples.push(Triple::new(links[i].clone(), Iri::new(rdf::FIRST), object));
        triples.push(Triple::new(links[i].clone(), Iri::new(rdf::REST), next));
    }
    Ok((links[0].clone(), triples))
}

/// Returns `true` if `node` has `rdf:first` or `rdf:rest` triples, i.e.
/// looks like a collection link whether or not the chain is well formed.
pub fn looks_like_link<S: TripleStore + ?Sized>(
    store: &S,
    node: &Node,
) -> Result<bool, StorageError> {
    if !node.is_anchor() {
        return Ok(false);
    }
    Ok(store.triples_with_subject(node)?.iter().any(|t| {
        let p = t.predicate.as_str();
        p == rdf::FIRST || p == rdf::REST
    }))
}
