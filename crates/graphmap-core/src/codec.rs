//! The value codec: native [`Value`]s to graph [`Node`]s and back.
//!
//! [`encode`] tags each scalar with its datatype so that [`decode`] can
//! recover the exact native kind. Decoding never fails: a literal whose
//! datatype is unknown, or whose lexical form does not parse under its
//! datatype, comes back as text.
//!
//! Round trip: `decode(&encode(&v, ctx)?) == v` for every kind except
//! non-empty `List`, which is not a single node and is expanded into an
//! anchored chain by the collection layer. Date-times whose year falls
//! outside 0000-9999, or whose offset has a seconds part, have no such form
//! and are rejected with [`CoreError::UnrepresentableValue`].

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::CoreError;
use crate::lexical;
use crate::term::{Iri, Literal, Node};
use crate::value::Value;
use crate::vocab::{rdf, xsd};

/// The store-side context the encoder needs.
pub trait NodeContext {
    /// Returns a node usable in this store. IRIs and literals come back
    /// unchanged; anchors allocated elsewhere are mapped to local anchors.
    fn copy_node(&mut self, node: &Node) -> Node;
}

/// Encodes a native value as a single node.
///
/// Returns [`CoreError::UnsupportedValueKind`] for a non-empty `List` and
/// [`CoreError::UnrepresentableValue`] for a date-time with no round-trip form.
/// The empty list encodes as `rdf:nil`.
pub fn encode<C: NodeContext + ?Sized>(value: &Value, ctx: &mut C) -> Result<Node, CoreError> {
    let node = match value {
        Value::Bool(b) => typed(b.to_string(), xsd::BOOLEAN),
        Value::Integer(i) => typed(i.to_string(), xsd::INTEGER),
        Value::Float(f) => typed(lexical::format_float(*f), xsd::FLOAT),
        Value::Double(d) => typed(lexical::format_double(*d), xsd::DOUBLE),
        Value::Decimal(d) => typed(d.to_plain_string(), xsd::DECIMAL),
        Value::DateTime(dt) => {
            lexical::check_date_time(dt)?;
            typed(lexical::format_date_time(dt), xsd::DATE_TIME)
        }
        Value::Duration(d) => typed(lexical::format_duration(*d), xsd::DURATION),
        Value::Text(s) => Node::Literal(Literal::string(s)),
        Value::Char(c) => Node::Literal(Literal::string(c.to_string())),
        Value::Byte(b) => typed(b.to_string(), xsd::UNSIGNED_BYTE),
        Value::Uri(url) => Node::Iri(Iri::from(url)),
        Value::Node(node) => ctx.copy_node(node),
        Value::List(items) if items.is_empty() => Node::iri(rdf::NIL),
        Value::List(_) => {
            return Err(CoreError::UnsupportedValueKind {
                kind: value.kind_name(),
            })
        }
    };
    Ok(node)
}

/// Decodes a node to the most specific native value it represents.
///
/// IRIs and anchors decode to a [`Value::Node`] reference, except `rdf:nil`
/// which decodes to the empty list.
pub fn decode(node: &Node) -> Value {
    match node {
        Node::Iri(iri) if iri.as_str() == rdf::NIL => Value::List(Vec::new()),
        Node::Iri(_) | Node::Anchor(_) => Value::Node(node.clone()),
        Node::Literal(lit) => decode_literal(lit),
    }
}

fn typed(lexical: String, datatype: &str) -> Node {
    Node::Literal(Literal::typed(lexical, datatype))
}

fn decode_literal(lit: &Literal) -> Value {
    let lex = lit.lexical();
    let decoded = match lit.datatype().as_str() {
        xsd::BOOLEAN => lexical::parse_boolean(lex).map(Value::Bool),
        xsd::DOUBLE => lexical::parse_double(lex).map(Value::Double),
        xsd::FLOAT => lexical::parse_float(lex).map(Value::Float),
        xsd::DECIMAL => BigDecimal::from_str(lex.trim()).ok().map(Value::Decimal),
        xsd::DATE_TIME => lexical::parse_date_time(lex).map(Value::DateTime),
        xsd::DURATION => lexical::parse_duration(lex).map(Value::Duration),
        xsd::UNSIGNED_BYTE => lex.trim().parse::<u8>().ok().map(Value::Byte),
        dt if xsd::is_integer_family(dt) => lex.trim().parse::<i64>().ok().map(Value::Integer),
        _ => None,
    };
    decoded.unwrap_or_else(|| Value::Text(lex.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{AnchorId, StoreId};
    use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
    use proptest::prelude::*;
    use std::collections::HashMap;
    use url::Url;

    /// Minimal context: one store identity, foreign anchors remapped once.
    struct TestContext {
        store: StoreId,
        next: u64,
        imported: HashMap<AnchorId, AnchorId>,
    }

    impl TestContext {
        fn new() -> Self {
            TestContext {
                store: StoreId::random(),
                next: 0,
                imported: HashMap::new(),
            }
        }

        fn anchor(&mut self) -> Node {
            let id = AnchorId {
                store: self.store,
                index: self.next,
            };
            self.next += 1;
            Node::Anchor(id)
        }
    }

    impl NodeContext for TestContext {
        fn copy_node(&mut self, node: &Node) -> Node {
            match node {
                Node::Anchor(id) if id.store != self.store => {
                    if let Some(local) = self.imported.get(id) {
                        return Node::Anchor(*local);
                    }
                    let Node::Anchor(local) = self.anchor() else {
                        unreachable!()
                    };
                    self.imported.insert(*id, local);
                    Node::Anchor(local)
                }
                other => other.clone(),
            }
        }
    }

    fn roundtrip(v: Value) -> Value {
        let mut ctx = TestContext::new();
        decode(&encode(&v, &mut ctx).unwrap())
    }

    fn datatype_of(v: Value) -> String {
        let mut ctx = TestContext::new();
        let node = encode(&v, &mut ctx).unwrap();
        node.as_literal().unwrap().datatype().as_str().to_string()
    }

    #[test]
    fn encode_tags_datatypes() {
        assert_eq!(datatype_of(Value::Bool(true)), xsd::BOOLEAN);
        assert_eq!(datatype_of(Value::from(5i32)), xsd::INTEGER);
        assert_eq!(datatype_of(Value::Float(1.5)), xsd::FLOAT);
        assert_eq!(datatype_of(Value::Double(1.5)), xsd::DOUBLE);
        assert_eq!(datatype_of(Value::Byte(255)), xsd::UNSIGNED_BYTE);
        assert_eq!(datatype_of(Value::Char('c')), xsd::STRING);
        assert_eq!(datatype_of(Value::Duration(TimeDelta::days(1))), xsd::DURATION);
    }

    #[test]
    fn encode_extreme_values() {
        let mut ctx = TestContext::new();
        let node = encode(&Value::Integer(i64::MAX), &mut ctx).unwrap();
        assert_eq!(node.as_literal().unwrap().lexical(), "9223372036854775807");

        let node = encode(&Value::Byte(u8::MAX), &mut ctx).unwrap();
        assert_eq!(node.as_literal().unwrap().lexical(), "255");

        let node = encode(&Value::Text(String::new()), &mut ctx).unwrap();
        assert_eq!(node, Node::string(""));
    }

    #[test]
    fn float_kind_is_preserved() {
        assert_eq!(roundtrip(Value::Float(0.25)), Value::Float(0.25));
        assert_eq!(roundtrip(Value::Double(0.25)), Value::Double(0.25));
        assert_ne!(roundtrip(Value::Float(0.25)), Value::Double(0.25));
    }

    #[test]
    fn nan_roundtrips() {
        assert_eq!(roundtrip(Value::Double(f64::NAN)), Value::Double(f64::NAN));
        assert_eq!(roundtrip(Value::Float(f32::NAN)), Value::Float(f32::NAN));
    }

    #[test]
    fn uri_encodes_to_iri_node() {
        let mut ctx = TestContext::new();
        let url = Url::parse("http://example.com/o").unwrap();
        let node = encode(&Value::Uri(url.clone()), &mut ctx).unwrap();
        assert_eq!(node, Node::iri("http://example.com/o"));
        // Decodes to a node reference that still equals the URI.
        assert_eq!(decode(&node), Value::Uri(url));
        assert!(matches!(decode(&node), Value::Node(_)));
    }

    #[test]
    fn local_anchor_is_kept() {
        let mut ctx = TestContext::new();
        let anchor = ctx.anchor();
        let node = encode(&Value::Node(anchor.clone()), &mut ctx).unwrap();
        assert_eq!(node, anchor);
    }

    #[test]
    fn foreign_anchor_is_copied_once() {
        let mut ctx = TestContext::new();
        let foreign = Node::Anchor(AnchorId {
            store: StoreId::random(),
            index: 3,
        });
        let first = encode(&Value::Node(foreign.clone()), &mut ctx).unwrap();
        let second = encode(&Value::Node(foreign.clone()), &mut ctx).unwrap();
        assert_ne!(first, foreign);
        assert_eq!(first, second);
    }

    #[test]
    fn list_handling() {
        let mut ctx = TestContext::new();
        let empty = encode(&Value::List(vec![]), &mut ctx).unwrap();
        assert_eq!(empty, Node::iri(rdf::NIL));
        assert_eq!(decode(&empty), Value::List(vec![]));

        let err = encode(&Value::list([1, 2]), &mut ctx).unwrap_err();
        assert_eq!(err, CoreError::UnsupportedValueKind { kind: "List" });
    }

    #[test]
    fn decode_known_datatypes() {
        let cases = [
            (xsd::DOUBLE, "0", Value::Double(0.0)),
            (xsd::FLOAT, "0", Value::Float(0.0)),
            (xsd::DECIMAL, "0", Value::Decimal(BigDecimal::from(0))),
            (xsd::BOOLEAN, "false", Value::Bool(false)),
            (xsd::INT, "0", Value::Integer(0)),
            (xsd::INTEGER, "2147483647", Value::Integer(2147483647)),
            (xsd::UNSIGNED_BYTE, "255", Value::Byte(255)),
            (xsd::DURATION, "P1D", Value::Duration(TimeDelta::days(1))),
        ];
        for (datatype, lexical, expected) in cases {
            let node = Node::Literal(Literal::typed(lexical, datatype));
            assert_eq!(decode(&node), expected, "decoding {} as {}", lexical, datatype);
        }

        let node = Node::Literal(Literal::typed("1900-01-01", xsd::DATE_TIME));
        assert!(matches!(decode(&node), Value::DateTime(_)));
    }

    #[test]
    fn unknown_datatype_degrades_to_text() {
        let node = Node::Literal(Literal::typed("", "http://example.com/datatype"));
        assert_eq!(decode(&node), Value::Text(String::new()));
    }

    #[test]
    fn malformed_lexical_degrades_to_text() {
        let node = Node::Literal(Literal::typed("abc", xsd::INTEGER));
        assert_eq!(decode(&node), Value::Text("abc".into()));

        let node = Node::Literal(Literal::typed("99999999999999999999", xsd::LONG));
        assert_eq!(decode(&node), Value::Text("99999999999999999999".into()));
    }

    #[test]
    fn date_time_offset_survives() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(roundtrip(Value::DateTime(dt)), Value::DateTime(dt));
    }

    #[test]
    fn date_time_without_lexical_form_rejected() {
        let far = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(12_000, 6, 1, 0, 0, 0)
            .unwrap();
        let err = encode(&Value::DateTime(far), &mut TestContext::new()).unwrap_err();
        assert!(matches!(err, CoreError::UnrepresentableValue { .. }));

        let seconds_offset = FixedOffset::east_opt(-(2 * 3600 + 30))
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
            .unwrap();
        assert!(encode(&Value::DateTime(seconds_offset), &mut TestContext::new()).is_err());
    }

    fn scalar_value() -> impl Strategy<Value = Value> {
        let date_time = (
            -62_135_000_000i64..253_402_000_000i64,
            0u32..1_000_000_000,
            -1439i32..1440,
        )
            .prop_map(|(secs, nanos, offset_minutes)| {
                let offset = FixedOffset::east_opt(offset_minutes * 60).unwrap();
                let utc = DateTime::from_timestamp(secs, nanos).unwrap();
                Value::DateTime(utc.with_timezone(&offset))
            });
        let duration = (-1_000_000_000_000i64..1_000_000_000_000i64, 0u32..1_000_000_000)
            .prop_map(|(secs, nanos)| Value::Duration(TimeDelta::new(secs, nanos).unwrap()));
        let decimal = (any::<i64>(), 0i64..12)
            .prop_map(|(digits, scale)| Value::Decimal(BigDecimal::new(digits.into(), scale)));

        prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Integer),
            any::<i32>().prop_map(Value::from),
            any::<f32>()
                .prop_filter("NaN payloads are not preserved", |f| !f.is_nan())
                .prop_map(Value::Float),
            any::<f64>()
                .prop_filter("NaN payloads are not preserved", |f| !f.is_nan())
                .prop_map(Value::Double),
            decimal,
            date_time,
            duration,
            any::<String>().prop_map(Value::Text),
            any::<char>().prop_map(Value::Char),
            any::<u8>().prop_map(Value::Byte),
            "[a-z]{1,8}".prop_map(|s| Value::Node(Node::iri(format!("urn:{}", s)))),
            "[a-z]{1,8}".prop_map(|s| Value::Uri(Url::parse(&format!("http://example.com/{}", s)).unwrap())),
        ]
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(v in scalar_value()) {
            prop_assert_eq!(roundtrip(v.clone()), v);
        }
    }
}
