//! Key resolution against an optional base namespace.
//!
//! Callers name predicates (and subjects) by full identifier, by short name,
//! or by an existing node. [`Namespace::resolve`] turns any of these into an
//! absolute [`Iri`]; a short name needs a base namespace to resolve.

use url::{ParseError, Url};

use crate::error::CoreError;
use crate::term::{Iri, Node};

/// A key as the caller spells it.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// A full identifier or a short name relative to the base namespace.
    Name(String),
    Iri(Iri),
    Url(Url),
    Node(Node),
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Name(s.clone())
    }
}

impl From<Iri> for Key {
    fn from(iri: Iri) -> Self {
        Key::Iri(iri)
    }
}

impl From<&Iri> for Key {
    fn from(iri: &Iri) -> Self {
        Key::Iri(iri.clone())
    }
}

impl From<Url> for Key {
    fn from(url: Url) -> Self {
        Key::Url(url)
    }
}

impl From<Node> for Key {
    fn from(node: Node) -> Self {
        Key::Node(node)
    }
}

impl From<&Node> for Key {
    fn from(node: &Node) -> Self {
        Key::Node(node.clone())
    }
}

/// The base namespace short names are resolved against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    base: Option<Url>,
}

impl Namespace {
    pub fn new(base: Option<Url>) -> Self {
        Namespace { base }
    }

    pub fn with_base(base: Url) -> Self {
        Namespace { base: Some(base) }
    }

    pub fn base(&self) -> Option<&Url> {
        self.base.as_ref()
    }

    /// Resolves a key to an absolute IRI usable in predicate position.
    ///
    /// An absolute identifier keeps its original spelling. A relative one is
    /// joined onto the base namespace, or fails with
    /// [`CoreError::NoBaseNamespace`] when there is none.
    pub fn resolve(&self, key: &Key) -> Result<Iri, CoreError> {
        match key {
            Key::Iri(iri) => Ok(iri.clone()),
            Key::Url(url) => Ok(Iri::from(url)),
            Key::Node(Node::Iri(iri)) => Ok(iri.clone()),
            Key::Node(other) => Err(CoreError::InvalidKey {
                reason: format!("expected an IRI node, found {}", other.kind_name()),
            }),
            Key::Name(name) => self.resolve_name(name),
        }
    }

    /// Resolves a key usable in subject position: IRIs and anchors.
    pub fn resolve_subject(&self, key: &Key) -> Result<Node, CoreError> {
        match key {
            Key::Node(Node::Anchor(id)) => Ok(Node::Anchor(*id)),
            other => self.resolve(other).map(Node::Iri),
        }
    }

    /// Reports an IRI relative to the base namespace when it lies under it,
    /// or as its full identifier otherwise.
    pub fn short_name(&self, iri: &Iri) -> String {
        if let Some(base) = &self.base {
            if let Some(rest) = iri.as_str().strip_prefix(base.as_str()) {
                if !rest.is_empty() {
                    return rest.to_string();
                }
            }
        }
        iri.as_str().to_string()
    }

    fn resolve_name(&self, name: &str) -> Result<Iri, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidKey {
                reason: "key is empty".to_string(),
            });
        }

        match Url::parse(name) {
            Ok(_) => Ok(Iri::new(name)),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let base = self.base.as_ref().ok_or_else(|| CoreError::NoBaseNamespace {
                    name: name.to_string(),
                })?;
                base.join(name).map(Iri::from).map_err(|e| CoreError::InvalidIri {
                    iri: name.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(CoreError::InvalidIri {
                iri: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
