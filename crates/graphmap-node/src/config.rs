//! Configuration for [`NodeMap`](crate::NodeMap).

use serde::{Deserialize, Serialize};
use url::Url;

use graphmap_core::Namespace;

use crate::error::MapError;

/// Settings shared by every map built from it.
///
/// ```json
/// { "base_namespace": "http://example.org/vocab/" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Base IRI that short key names are resolved against.
    pub base_namespace: Option<Url>,
}

impl MapConfig {
    pub fn with_base(base: Url) -> Self {
        MapConfig {
            base_namespace: Some(base),
        }
    }

    /// Parses a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::new(self.base_namespace.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config =
            MapConfig::from_json(r#"{"base_namespace": "http://example.org/v/"}"#).unwrap();
        assert_eq!(
            config.base_namespace.as_ref().map(Url::as_str),
            Some("http://example.org/v/")
        );
    }

    #[test]
    fn test_from_json_defaults() {
        assert_eq!(MapConfig::from_json("{}").unwrap(), MapConfig::default());
    }

    #[test]
    fn test_from_json_rejects_bad_url() {
        let err = MapConfig::from_json(r#"{"base_namespace": "not a url"}"#).unwrap_err();
        assert!(matches!(err, MapError::Config(_)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = MapConfig::with_base(Url::parse("urn:example:").unwrap());
        let json = serde_json::to_string(&config).unwrap();
        let back: MapConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_namespace_uses_base() {
        let config = MapConfig::with_base(Url::parse("http://example.org/v/").unwrap());
        let iri = config.namespace().resolve(&"name".into()).unwrap();
        assert_eq!(iri.as_str(), "http://example.org/v/name");
    }
}
