//! Configuration documents: the JSON parameter matrix of one benchmark run.
//!
//! A document is either a single object of benchmark parameters or an array
//! of such objects (one per workload variant). Any other top-level shape is
//! rejected at the boundary so the rest of the system never sees it.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::LedgerError;

/// One benchmark's parameter matrix.
///
/// Stored verbatim in the ledger; the canonical JSON string is the row
/// identity, so two documents compare equal iff their canonical forms match.
/// serde_json's default map keeps keys ordered, which makes
/// [`ConfigDocument::canonical_json`] deterministic regardless of the key
/// order in the source file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigDocument {
    /// A single parameter object, e.g. `{"clients": [1, 2, 4], "tls": true}`
    Object(Map<String, Value>),
    /// An array of parameter objects, one per workload variant
    Array(Vec<Map<String, Value>>),
}

impl ConfigDocument {
    /// Parse a document from JSON text, rejecting unsupported shapes.
    pub fn from_json_str(text: &str) -> Result<Self, LedgerError> {
        let value: Value = serde_json::from_str(text)?;
        Self::try_from(value)
    }

    /// The canonical JSON string used as the stored identity of this
    /// document.
    pub fn canonical_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Convert back into a plain `serde_json::Value`.
    pub fn to_value(&self) -> Value {
        match self {
            ConfigDocument::Object(map) => Value::Object(map.clone()),
            ConfigDocument::Array(objects) => Value::Array(
                objects.iter().cloned().map(Value::Object).collect(),
            ),
        }
    }

    /// A short human summary for log lines: the keys of the (first) object.
    pub fn summary(&self) -> String {
        let keys = |map: &Map<String, Value>| -> String {
            map.keys().cloned().collect::<Vec<_>>().join(",")
        };
        match self {
            ConfigDocument::Object(map) => keys(map),
            ConfigDocument::Array(objects) => match objects.first() {
                Some(first) => format!("[{} x{}]", keys(first), objects.len()),
                None => "[]".to_string(),
            },
        }
    }
}

impl TryFrom<Value> for ConfigDocument {
    type Error = LedgerError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(ConfigDocument::Object(map)),
            Value::Array(items) => {
                let mut objects = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(map) => objects.push(map),
                        other => {
                            return Err(LedgerError::InvalidInput(format!(
                                "config array elements must be objects, got {other}"
                            )))
                        }
                    }
                }
                Ok(ConfigDocument::Array(objects))
            }
            other => Err(LedgerError::InvalidInput(format!(
                "config must be an object or an array of objects, got {other}"
            ))),
        }
    }
}

impl Serialize for ConfigDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConfigDocument::try_from(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_document_roundtrip() {
        let doc = ConfigDocument::from_json_str(r#"{"clients": [1, 2], "tls": true}"#).unwrap();
        assert!(matches!(doc, ConfigDocument::Object(_)));

        let reparsed = ConfigDocument::from_json_str(&doc.canonical_json()).unwrap();
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn test_array_document() {
        let doc =
            ConfigDocument::from_json_str(r#"[{"clients": [1]}, {"data_sizes": [16, 64]}]"#)
                .unwrap();
        match doc {
            ConfigDocument::Array(objects) => assert_eq!(objects.len(), 2),
            _ => panic!("Expected array document"),
        }
    }

    #[test]
    fn test_canonical_json_is_key_order_independent() {
        let a = ConfigDocument::from_json_str(r#"{"tls": true, "clients": [1, 2]}"#).unwrap();
        let b = ConfigDocument::from_json_str(r#"{"clients": [1, 2], "tls": true}"#).unwrap();
        assert_eq!(a.canonical_json(), b.canonical_json());
    }

    #[test]
    fn test_scalar_document_rejected() {
        assert!(ConfigDocument::from_json_str("42").is_err());
        assert!(ConfigDocument::from_json_str(r#""io-threads""#).is_err());
    }

    #[test]
    fn test_array_of_scalars_rejected() {
        assert!(ConfigDocument::from_json_str("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let doc = ConfigDocument::try_from(json!([{"io-threads": [1, 4]}])).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        let decoded: ConfigDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(doc, decoded);
    }
}
