//! Graph terms: IRIs, anchor (blank) nodes, typed literals, and triples.
//!
//! Terms are the opaque identifiers of the store. Equality is structural for
//! IRIs and literals. Anchor identities carry the [`StoreId`] of the store
//! that allocated them, so two anchors are equal only if they come from the
//! same allocation in the same store.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::CoreError;
use crate::vocab::xsd;

/// An absolute IRI, always fully expanded (never a prefixed or short name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(Arc<str>);

impl Iri {
    /// Wraps an already absolute IRI without validation.
    pub fn new(iri: impl AsRef<str>) -> Self {
        Iri(Arc::from(iri.as_ref()))
    }

    /// Parses and validates an absolute IRI.
    ///
    /// The original text is kept as-is; parsing only checks that it is absolute.
    pub fn parse(iri: &str) -> Result<Self, CoreError> {
        Url::parse(iri).map_err(|e| CoreError::InvalidIri {
            iri: iri.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Iri::new(iri))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Url> for Iri {
    fn from(url: Url) -> Self {
        Iri::new(url.as_str())
    }
}

impl From<&Url> for Iri {
    fn from(url: &Url) -> Self {
        Iri::new(url.as_str())
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Identity of a triple store. Every anchor node records the store it
/// was allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(pub Uuid);

impl StoreId {
    /// Allocates a fresh random store identity.
    pub fn random() -> Self {
        StoreId(Uuid::new_v4())
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreId({})", self.0)
    }
}

/// A store-local placeholder identity. Never reused across stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId {
    pub store: StoreId,
    pub index: u64,
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:b{}", self.index)
    }
}

/// A typed literal: lexical form plus datatype IRI.
///
/// There are no untyped literals; plain text uses `xsd:string`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    lexical: Arc<str>,
    datatype: Iri,
}

impl Literal {
    pub fn new(lexical: impl AsRef<str>, datatype: Iri) -> Self {
        Literal {
            lexical: Arc::from(lexical.as_ref()),
            datatype,
        }
    }

    /// Creates an `xsd:string` literal.
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Literal::new(lexical, Iri::new(xsd::STRING))
    }

    /// Creates a literal whose datatype is given as a raw IRI string.
    pub fn typed(lexical: impl AsRef<str>, datatype: &str) -> Self {
        Literal::new(lexical, Iri::new(datatype))
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    /// Returns `true` if this literal is plain text (`xsd:string`).
    pub fn is_string(&self) -> bool {
        self.datatype.as_str() == xsd::STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.lexical.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c => write!(f, "{}", c)?,
            }
        }
        f.write_str("\"")?;
        if !self.is_string() {
            write!(f, "^^{}", self.datatype)?;
        }
        Ok(())
    }
}

/// A node in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Node {
    /// A URI reference.
    Iri(Iri),
    /// A placeholder identity scoped to one store.
    Anchor(AnchorId),
    /// A typed literal.
    Literal(Literal),
}

impl Node {
    /// Convenience constructor for an IRI node (no validation).
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Node::Iri(Iri::new(iri))
    }

    /// Convenience constructor for an `xsd:string` literal node.
    pub fn string(lexical: impl AsRef<str>) -> Self {
        Node::Literal(Literal::string(lexical))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, Node::Anchor(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Node::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_anchor(&self) -> Option<AnchorId> {
        match self {
            Node::Anchor(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Human-readable kind name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Iri(_) => "Iri",
            Node::Anchor(_) => "Anchor",
            Node::Literal(_) => "Literal",
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

impl From<AnchorId> for Node {
    fn from(id: AnchorId) -> Self {
        Node::Anchor(id)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "{}", iri),
            Node::Anchor(id) => write!(f, "{}", id),
            Node::Literal(lit) => write!(f, "{}", lit),
        }
    }
}

/// An immutable subject/predicate/object statement.
///
/// Editing a triple means retracting it and asserting a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: Iri, object: Node) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
