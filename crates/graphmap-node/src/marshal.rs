//! The collection marshaler: raw caller input to values and triples.
//!
//! Callers hand the property map an [`Objects`] (usually through `From`).
//! [`expand`] turns it into an ordered sequence of [`Value`]s. Text is
//! always one value. A `Vec` or slice expands to its items. A
//! [`Value::List`] is an explicit ordered collection and stays one value,
//! which [`build_subgraph`] turns into an anchor-rooted molecule.

use smallvec::SmallVec;
use url::Url;

use graphmap_core::{encode, Iri, Node, Triple, Value};
use graphmap_storage::{build_collection, Molecule, Subgraph, TripleStore};

use crate::error::MapError;

/// Raw input to a property-map write.
#[derive(Debug, Clone, PartialEq)]
pub enum Objects {
    /// No values; clears the predicate on `set`.
    None,
    One(Value),
    Many(Vec<Value>),
}

macro_rules! scalar_objects {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Objects {
                fn from(v: $t) -> Self {
                    Objects::One(Value::from(v))
                }
            }
        )*
    };
}

scalar_objects!(bool, i8, i16, i32, i64, u8, f32, f64, char, String, &str, Node, Iri, Url);

impl From<Value> for Objects {
    fn from(v: Value) -> Self {
        Objects::One(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Objects {
    fn from(items: Vec<T>) -> Self {
        Objects::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Objects {
    fn from(items: &[T]) -> Self {
        Objects::Many(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Objects {
    fn from(items: [T; N]) -> Self {
        Objects::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Objects>> From<Option<T>> for Objects {
    fn from(v: Option<T>) -> Self {
        v.map_or(Objects::None, Into::into)
    }
}

/// How an expansion is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One triple per value.
    Flat,
    /// The input was a single explicit ordered collection.
    OrderedCollection,
}

/// The result of [`expand`].
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub values: SmallVec<[Value; 1]>,
    pub mode: Mode,
}

impl Expansion {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Expands raw input into the values it denotes.
pub fn expand(raw: impl Into<Objects>) -> Expansion {
    match raw.into() {
        Objects::None => Expansion {
            values: SmallVec::new(),
            mode: Mode::Flat,
        },
        Objects::One(value) => {
            let mode = if value.is_list() {
                Mode::OrderedCollection
            } else {
                Mode::Flat
            };
            Expansion {
                values: SmallVec::from_elem(value, 1),
                mode,
            }
        }
        Objects::Many(values) => Expansion {
            values: values.into(),
            mode: Mode::Flat,
        },
    }
}

/// Builds the desired (subject, predicate) subgraph for `values`.
///
/// Scalars and references become flat triples. A non-empty list becomes a
/// molecule over freshly allocated anchors, once per distinct content; the
/// empty list is the flat triple `(subject, predicate, rdf:nil)`. Nothing is
/// written to the store.
pub fn build_subgraph<S: TripleStore + ?Sized>(
    store: &mut S,
    subject: &Node,
    predicate: &Iri,
    values: &[Value],
) -> Result<Subgraph, MapError> {
    let mut subgraph = Subgraph::default();
    for value in values {
        match value {
            Value::List(items) if !items.is_empty() => {
                if subgraph.molecules.iter().any(|m| m.items == *items) {
                    continue;
                }
                let (head, chain) = build_collection(store, items)?;
                subgraph.molecules.push(Molecule {
                    link: Triple::new(subject.clone(), predicate.clone(), head),
                    chain,
                    items: items.clone(),
                    owned: true,
                });
            }
            other => {
                let object = encode(other, store)?;
                subgraph
                    .triples
                    .push(Triple::new(subject.clone(), predicate.clone(), object));
            }
        }
    }
    Ok(subgraph)
}
