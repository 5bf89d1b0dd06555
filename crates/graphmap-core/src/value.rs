//! Native value representation for the property-map layer.
//!
//! [`Value`] is a closed sum type: every kind a caller can read or write is a
//! variant, and the codec matches on it exhaustively. Adding a kind means
//! adding a variant here and an arm in [`crate::codec`].
//!
//! Equality is content equality rather than derived structural equality:
//! - `Float`/`Double` compare by bit pattern, so `NaN == NaN` and re-setting
//!   the same value never looks like a change.
//! - `Uri(u)` equals `Node(Node::Iri(i))` when both spell the same IRI.
//! - `Char(c)` equals `Text(s)` when `s` is exactly the one character `c`.
//! - `DateTime` compares instant and offset.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use url::Url;

use crate::term::{Iri, Node};

/// A native value, exactly one kind active at a time.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    /// All signed integer widths widen to 64 bits.
    Integer(i64),
    Float(f32),
    Double(f64),
    Decimal(BigDecimal),
    DateTime(DateTime<FixedOffset>),
    Duration(TimeDelta),
    Text(String),
    Char(char),
    Byte(u8),
    /// A reference to an existing node (IRI, anchor, or raw literal).
    Node(Node),
    /// A URI reference; encodes to an IRI node.
    Uri(Url),
    /// An ordered collection, stored as an anchor-rooted chain.
    List(Vec<Value>),
}

impl Value {
    /// Builds an ordered collection from anything convertible to values.
    pub fn list<I, T>(items: I) -> Value
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns a human-readable name of the active kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Decimal(_) => "Decimal",
            Value::DateTime(_) => "DateTime",
            Value::Duration(_) => "Duration",
            Value::Text(_) => "Text",
            Value::Char(_) => "Char",
            Value::Byte(_) => "Byte",
            Value::Node(_) => "Node",
            Value::Uri(_) => "Uri",
            Value::List(_) => "List",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn iri_matches_url(node: &Node, url: &Url) -> bool {
    node.as_iri().is_some_and(|iri| iri.as_str() == url.as_str())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b && a.offset() == b.offset(),
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Char(c), Value::Text(s)) | (Value::Text(s), Value::Char(c)) => {
                single_char(s) == Some(*c)
            }
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Node(a), Value::Node(b)) => a == b,
            (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::Uri(url), Value::Node(node)) | (Value::Node(node), Value::Uri(url)) => {
                iri_matches_url(node, url)
            }
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

// Conversions from native Rust types.

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Integer(v.into())
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Integer(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Byte(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.fixed_offset())
    }
}

/// A date-time without offset is taken as UTC.
impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v.and_utc().fixed_offset())
    }
}

impl From<TimeDelta> for Value {
    fn from(v: TimeDelta) -> Self {
        Value::Duration(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<Node> for Value {
    fn from(v: Node) -> Self {
        Value::Node(v)
    }
}

impl From<Iri> for Value {
    fn from(v: Iri) -> Self {
        Value::Node(Node::Iri(v))
    }
}

impl From<Url> for Value {
    fn from(v: Url) -> Self {
        Value::Uri(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen() {
        assert_eq!(Value::from(7i8), Value::Integer(7));
        assert_eq!(Value::from(7i16), Value::Integer(7));
        assert_eq!(Value::from(7i32), Value::Integer(7));
    }

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Float(1.0), Value::Double(1.0));
    }

    #[test]
    fn uri_equals_iri_node() {
        let url = Url::parse("http://example.com/o").unwrap();
        assert_eq!(Value::Uri(url.clone()), Value::Node(Node::iri("http://example.com/o")));
        assert_ne!(Value::Uri(url), Value::Node(Node::iri("http://example.com/x")));
    }

    #[test]
    fn char_equals_single_char_text() {
        assert_eq!(Value::Char('x'), Value::from("x"));
        assert_ne!(Value::Char('x'), Value::from("xy"));
        assert_ne!(Value::Char('x'), Value::from(""));
    }

    #[test]
    fn naive_date_time_is_utc() {
        let naive = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let Value::DateTime(dt) = Value::from(naive) else {
            panic!("expected DateTime");
        };
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn list_constructor() {
        let list = Value::list([1, 2, 3]);
        assert_eq!(
            list.as_list().unwrap(),
            &[Value::Integer(1), Value::Integer(2), Value::Integer(3)]
        );
        assert_eq!(list.kind_name(), "List");
    }
}
