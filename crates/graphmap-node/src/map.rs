//! The node property map.
//!
//! [`NodeMap`] presents one subject of a [`TripleStore`] as a map from
//! predicate to values. Keys are full IRIs or short names resolved against
//! the configured base namespace.
//!
//! `get` never fails for a predicate without triples; it returns an empty
//! [`ObjectCollection`]. Use [`NodeMap::require`] when a predicate must
//! have values.
//!
//! `set` replaces a predicate's values by diffing the stored subgraph
//! against the desired one and applying only the delta: retractions first,
//! then assertions. Flat triples are applied atomically. Replacing an
//! ordered collection is two store calls, so a failure in between leaves
//! the old molecule removed and the new one not yet added.
//!
//! A list chain reachable from more than one triple belongs to none of them:
//! removing or replacing one reference retracts only that link triple.

use indexmap::IndexSet;
use tracing::debug;

use graphmap_core::{Iri, Key, Namespace, Node, Value};
use graphmap_storage::{compute_diff, read_subgraph, DiffReport, TripleStore};

use crate::collection::{
    contains_value, decode_object, retract_values, unstored_values, ObjectCollection,
};
use crate::config::MapConfig;
use crate::error::MapError;
use crate::marshal::{build_subgraph, expand, Objects};

/// A property-map view over one subject.
pub struct NodeMap<'g, S: TripleStore + ?Sized> {
    store: &'g mut S,
    subject: Node,
    namespace: Namespace,
}

impl<'g, S: TripleStore + ?Sized> NodeMap<'g, S> {
    /// Binds a map to `subject`.
    ///
    /// The subject must be an IRI or an anchor; an anchor from another store
    /// is copied into this one.
    pub fn new(
        store: &'g mut S,
        subject: impl Into<Key>,
        config: &MapConfig,
    ) -> Result<Self, MapError> {
        let namespace = config.namespace();
        let subject = namespace.resolve_subject(&subject.into())?;
        let subject = store.copy_node(&subject);
        Ok(NodeMap {
            store,
            subject,
            namespace,
        })
    }

    pub fn subject(&self) -> &Node {
        &self.subject
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn store(&self) -> &S {
        &*self.store
    }

    fn predicate(&self, key: impl Into<Key>) -> Result<Iri, MapError> {
        Ok(self.namespace.resolve(&key.into())?)
    }

    // ---- reads ----

    /// The live collection for `key`. Empty if the predicate is unused.
    pub fn get(&mut self, key: impl Into<Key>) -> Result<ObjectCollection<'_, S>, MapError> {
        let predicate = self.predicate(key)?;
        Ok(ObjectCollection::new(
            &mut *self.store,
            self.subject.clone(),
            predicate,
        ))
    }

    /// Decoded values for `key`, in assertion order. Empty if unused.
    pub fn values(&self, key: impl Into<Key>) -> Result<Vec<Value>, MapError> {
        let predicate = self.predicate(key)?;
        self.values_of(&predicate)
    }

    fn values_of(&self, predicate: &Iri) -> Result<Vec<Value>, MapError> {
        self.store
            .triples_with_subject_predicate(&self.subject, predicate)?
            .iter()
            .map(|t| decode_object(&*self.store, &t.object))
            .collect()
    }

    /// Like [`values`](Self::values), but fails with
    /// [`MapError::KeyNotFound`] if the predicate has no triples.
    pub fn require(&self, key: impl Into<Key>) -> Result<Vec<Value>, MapError> {
        let predicate = self.predicate(key)?;
        let values = self.values_of(&predicate)?;
        if values.is_empty() {
            return Err(MapError::KeyNotFound { predicate });
        }
        Ok(values)
    }

    /// True iff at least one triple exists for the predicate.
    pub fn contains_key(&self, key: impl Into<Key>) -> Result<bool, MapError> {
        let predicate = self.predicate(key)?;
        Ok(!self
            .store
            .triples_with_subject_predicate(&self.subject, &predicate)?
            .is_empty())
    }

    /// True iff every value `raw` expands to is present. False for no values.
    pub fn contains(
        &self,
        key: impl Into<Key>,
        raw: impl Into<Objects>,
    ) -> Result<bool, MapError> {
        let predicate = self.predicate(key)?;
        let expansion = expand(raw);
        if expansion.is_empty() {
            return Ok(false);
        }
        let current = read_subgraph(&*self.store, &self.subject, &predicate)?;
        Ok(expansion.values.iter().all(|v| contains_value(&current, v)))
    }

    /// Distinct predicates used with this subject, in first-seen order.
    pub fn keys(&self) -> Result<Vec<Iri>, MapError> {
        let keys: IndexSet<Iri> = self
            .store
            .triples_with_subject(&self.subject)?
            .into_iter()
            .map(|t| t.predicate)
            .collect();
        Ok(keys.into_iter().collect())
    }

    /// [`keys`](Self::keys) as short names relative to the base namespace.
    pub fn names(&self) -> Result<Vec<String>, MapError> {
        Ok(self
            .keys()?
            .iter()
            .map(|iri| self.namespace.short_name(iri))
            .collect())
    }

    pub fn entries(&self) -> Result<Vec<(Iri, Vec<Value>)>, MapError> {
        self.keys()?
            .into_iter()
            .map(|predicate| {
                let values = self.values_of(&predicate)?;
                Ok((predicate, values))
            })
            .collect()
    }

    // ---- writes ----

    /// Replaces the values of `key` with the expansion of `raw`.
    ///
    /// Values already stored are left untouched. An input with no values
    /// removes the predicate. Returns the applied delta.
    pub fn set(
        &mut self,
        key: impl Into<Key>,
        raw: impl Into<Objects>,
    ) -> Result<DiffReport, MapError> {
        let predicate = self.predicate(key)?;
        let expansion = expand(raw);
        let existing = read_subgraph(&*self.store, &self.subject, &predicate)?;
        let desired = build_subgraph(
            &mut *self.store,
            &self.subject,
            &predicate,
            &expansion.values,
        )?;

        let report = compute_diff(&existing, &desired);
        if report.is_empty() {
            return Ok(report);
        }

        self.store.retract(&report.retractions())?;
        self.store.assert(&report.assertions())?;
        debug!(
            subject = %self.subject,
            predicate = %predicate,
            removed_triples = report.removed_triples.len(),
            added_triples = report.added_triples.len(),
            removed_molecules = report.removed_molecules.len(),
            added_molecules = report.added_molecules.len(),
            "applied diff"
        );
        Ok(report)
    }

    /// Adds the expansion of `raw` without touching existing values. A list
    /// whose content is already stored is not added again.
    ///
    /// Returns the number of new triples. Fails with
    /// [`MapError::MissingValue`] if `raw` expands to nothing.
    pub fn add(
        &mut self,
        key: impl Into<Key>,
        raw: impl Into<Objects>,
    ) -> Result<usize, MapError> {
        let predicate = self.predicate(key)?;
        let expansion = expand(raw);
        if expansion.is_empty() {
            return Err(MapError::MissingValue { predicate });
        }
        let existing = read_subgraph(&*self.store, &self.subject, &predicate)?;
        let values = unstored_values(&existing, &expansion.values);
        let desired = build_subgraph(&mut *self.store, &self.subject, &predicate, &values)?;
        let added = self.store.assert(&desired.all_triples())?;
        debug!(
            subject = %self.subject,
            predicate = %predicate,
            values = expansion.values.len(),
            added,
            "add"
        );
        Ok(added)
    }

    /// Removes every value of `key`. Returns whether anything was removed.
    pub fn remove(&mut self, key: impl Into<Key>) -> Result<bool, MapError> {
        let predicate = self.predicate(key)?;
        self.remove_predicate(&predicate)
    }

    fn remove_predicate(&mut self, predicate: &Iri) -> Result<bool, MapError> {
        let existing = read_subgraph(&*self.store, &self.subject, predicate)?;
        if existing.is_empty() {
            return Ok(false);
        }
        let removed = self.store.retract(&existing.all_triples())?;
        debug!(
            subject = %self.subject,
            predicate = %predicate,
            values = existing.value_count(),
            "remove"
        );
        Ok(removed)
    }

    /// Removes only the values `raw` expands to. Ordered collections are
    /// matched by content and removed whole.
    pub fn remove_objects(
        &mut self,
        key: impl Into<Key>,
        raw: impl Into<Objects>,
    ) -> Result<bool, MapError> {
        let predicate = self.predicate(key)?;
        let expansion = expand(raw);
        retract_values(&mut *self.store, &self.subject, &predicate, &expansion.values)
    }

    /// Removes every predicate of this subject.
    pub fn clear(&mut self) -> Result<bool, MapError> {
        let mut removed = false;
        for predicate in self.keys()? {
            removed |= self.remove_predicate(&predicate)?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphmap_core::CoreError;
    use graphmap_storage::InMemoryStore;
    use url::Url;

    fn based() -> MapConfig {
        MapConfig::with_base(Url::parse("http://example.org/v/").unwrap())
    }

    #[test]
    fn test_short_names_need_base() {
        let mut store = InMemoryStore::new();
        let mut map = NodeMap::new(&mut store, "urn:s", &MapConfig::default()).unwrap();
        let err = map.set("name", "x").unwrap_err();
        assert!(matches!(
            err,
            MapError::Core(CoreError::NoBaseNamespace { .. })
        ));
    }

    #[test]
    fn test_short_and_full_keys_agree() {
        let mut store = InMemoryStore::new();
        let mut map = NodeMap::new(&mut store, "urn:s", &based()).unwrap();
        map.set("name", "x").unwrap();

        assert!(map.contains_key("http://example.org/v/name").unwrap());
        assert_eq!(map.names().unwrap(), vec!["name".to_string()]);
        assert_eq!(
            map.keys().unwrap(),
            vec![Iri::new("http://example.org/v/name")]
        );
    }

    #[test]
    fn test_literal_subject_rejected() {
        let mut store = InMemoryStore::new();
        let err = NodeMap::new(&mut store, Node::string("lit"), &MapConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, MapError::Core(CoreError::InvalidKey { .. })));
    }

    #[test]
    fn test_foreign_anchor_subject_is_copied() {
        let mut other = InMemoryStore::new();
        let foreign = other.fresh_anchor();
        let mut store = InMemoryStore::new();
        let mut map = NodeMap::new(&mut store, foreign.clone(), &MapConfig::default()).unwrap();

        assert_ne!(map.subject(), &foreign);
        map.add("urn:p", 1).unwrap();
        assert_eq!(map.values("urn:p").unwrap(), vec![Value::Integer(1)]);
    }

    #[test]
    fn test_require() {
        let mut store = InMemoryStore::new();
        let mut map = NodeMap::new(&mut store, "urn:s", &MapConfig::default()).unwrap();
        let err = map.require("urn:p").unwrap_err();
        assert!(matches!(err, MapError::KeyNotFound { .. }));

        map.add("urn:p", "v").unwrap();
        assert_eq!(map.require("urn:p").unwrap(), vec![Value::from("v")]);
    }

    #[test]
    fn test_add_without_values_fails() {
        let mut store = InMemoryStore::new();
        let mut map = NodeMap::new(&mut store, "urn:s", &MapConfig::default()).unwrap();
        let err = map.add("urn:p", Vec::<i64>::new()).unwrap_err();
        assert!(matches!(err, MapError::MissingValue { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_removes_all_predicates() {
        let mut store = InMemoryStore::new();
        store
            .assert(&[graphmap_core::Triple::new(
                Node::iri("urn:other"),
                Iri::new("urn:p"),
                Node::string("keep"),
            )])
            .unwrap();
        let mut map = NodeMap::new(&mut store, "urn:s", &MapConfig::default()).unwrap();
        map.set("urn:a", vec![1, 2]).unwrap();
        map.set("urn:b", Value::list(["x"])).unwrap();

        assert!(map.clear().unwrap());
        assert!(map.keys().unwrap().is_empty());
        assert!(!map.clear().unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_entries_in_key_order() {
        let mut store = InMemoryStore::new();
        let mut map = NodeMap::new(&mut store, "urn:s", &MapConfig::default()).unwrap();
        map.add("urn:b", 1).unwrap();
        map.add("urn:a", vec!["x", "y"]).unwrap();

        let entries = map.entries().unwrap();
        assert_eq!(
            entries,
            vec![
                (Iri::new("urn:b"), vec![Value::from(1)]),
                (Iri::new("urn:a"), vec![Value::from("x"), Value::from("y")]),
            ]
        );
    }
}
