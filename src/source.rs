//! Embedding source: the boundary with whatever produced the vectors.
//!
//! Vectors come from an external collaborator (term weighting or a text
//! encoder). This module only reads its JSON output into an
//! [`EntitySet`], in document order. Three shapes are accepted:
//!
//! ```text
//! mapping:   { "ana": [0.1, 0.3], "bo": [0.2, 0.0] }
//! records:   [ { "id": "ana", "embedding": [0.1, 0.3] }, ... ]
//! envelope:  { "mode": "tfidf", "embeddings": <mapping or records> }
//! ```

use crate::entity::EntitySet;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// How the vectors were generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// Term frequency-inverse document frequency weighting.
    Tfidf,
    /// Pretrained contextual encoder (CLS embedding).
    Bert,
}

impl FromStr for EmbeddingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tfidf" => Ok(EmbeddingMode::Tfidf),
            "bert" => Ok(EmbeddingMode::Bert),
            _ => Err(Error::UnsupportedMode { mode: s.to_string() }),
        }
    }
}

impl fmt::Display for EmbeddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingMode::Tfidf => write!(f, "tfidf"),
            EmbeddingMode::Bert => write!(f, "bert"),
        }
    }
}

/// Parsed source: validated entities plus the declared mode, if any.
#[derive(Debug, Clone)]
pub struct EmbeddingDocument {
    /// Mode declared by an envelope.
    pub mode: Option<EmbeddingMode>,
    /// Entities in document order.
    pub entities: EntitySet<String>,
}

/// Field names used when reading record arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Column holding the primary key.
    pub primary_key: String,
    /// Column holding the feature vector.
    pub vector_field: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary_key: "id".into(),
            vector_field: "embedding".into(),
        }
    }
}

impl SourceConfig {
    /// Create the default configuration (`id`, `embedding`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary key column.
    pub fn with_primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Set the vector column.
    pub fn with_vector_field(mut self, column: impl Into<String>) -> Self {
        self.vector_field = column.into();
        self
    }

    /// Parse a JSON string.
    pub fn parse_str(&self, json: &str) -> Result<EmbeddingDocument> {
        self.parse_value(serde_json::from_str(json)?)
    }

    /// Parse JSON from a reader.
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<EmbeddingDocument> {
        self.parse_value(serde_json::from_reader(reader)?)
    }

    /// Parse an already-decoded JSON value.
    pub fn parse_value(&self, value: Value) -> Result<EmbeddingDocument> {
        let (mode, body) = match value {
            Value::Object(mut map) if is_envelope(&map) => {
                let mode = match map.remove("mode") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(m)) => Some(m.parse::<EmbeddingMode>()?),
                    Some(other) => {
                        return Err(Error::UnsupportedMode {
                            mode: other.to_string(),
                        })
                    }
                };
                (mode, map.remove("embeddings").unwrap_or(Value::Null))
            }
            other => (None, other),
        };

        let pairs = match body {
            Value::Object(map) => mapping_pairs(map)?,
            Value::Array(records) => self.record_pairs(records)?,
            _ => {
                return Err(Error::MalformedSource {
                    record: 0,
                    message: "expected an object of vectors or an array of records".into(),
                })
            }
        };

        Ok(EmbeddingDocument {
            mode,
            entities: EntitySet::from_pairs(pairs)?,
        })
    }

    fn record_pairs(&self, records: Vec<Value>) -> Result<Vec<(String, Vec<f32>)>> {
        records
            .into_iter()
            .enumerate()
            .map(|(record, value)| {
                let Value::Object(mut fields) = value else {
                    return Err(Error::MalformedSource {
                        record,
                        message: "record is not an object".into(),
                    });
                };
                let key = fields
                    .remove(&self.primary_key)
                    .ok_or_else(|| Error::UnknownPrimaryKey {
                        column: self.primary_key.clone(),
                        record,
                    })?;
                let vector = fields
                    .remove(&self.vector_field)
                    .ok_or_else(|| Error::MalformedSource {
                        record,
                        message: format!("missing vector field '{}'", self.vector_field),
                    })?;
                Ok((key_string(record, key)?, parse_vector(record, vector)?))
            })
            .collect()
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    if map.contains_key("mode") && map.contains_key("embeddings") {
        return true;
    }
    match map.get("embeddings") {
        Some(Value::Object(_)) => true,
        Some(Value::Array(items)) => items.iter().any(Value::is_object),
        _ => false,
    }
}

fn mapping_pairs(map: Map<String, Value>) -> Result<Vec<(String, Vec<f32>)>> {
    map.into_iter()
        .enumerate()
        .map(|(record, (key, value))| Ok((key, parse_vector(record, value)?)))
        .collect()
}

fn key_string(record: usize, key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::MalformedSource {
            record,
            message: format!("primary key must be a string or number, got {other}"),
        }),
    }
}

fn parse_vector(record: usize, value: Value) -> Result<Vec<f32>> {
    let Value::Array(items) = value else {
        return Err(Error::MalformedSource {
            record,
            message: "vector is not an array".into(),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(i, x)| {
            x.as_f64().map(|v| v as f32).ok_or_else(|| Error::MalformedSource {
                record,
                message: format!("component {i} is not a number"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Key;

    fn keys(doc: &EmbeddingDocument) -> Vec<String> {
        doc.entities
            .keys()
            .filter_map(Key::as_leaf)
            .cloned()
            .collect()
    }

    #[test]
    fn mapping_keeps_document_order() {
        let doc = SourceConfig::new()
            .parse_str(r#"{"zed": [1, 0], "amy": [0, 1], "kim": [0.5, 0.5]}"#)
            .unwrap();
        assert_eq!(keys(&doc), vec!["zed", "amy", "kim"]);
        assert!(doc.mode.is_none());
        assert_eq!(doc.entities.dim(), 2);
    }

    #[test]
    fn records_use_configured_columns() {
        let doc = SourceConfig::new()
            .with_primary_key("student")
            .with_vector_field("vec")
            .parse_str(r#"[{"student": 7, "vec": [1, 2]}, {"student": "x", "vec": [3, 4]}]"#)
            .unwrap();
        assert_eq!(keys(&doc), vec!["7", "x"]);
    }

    #[test]
    fn missing_primary_key_names_column_and_record() {
        let err = SourceConfig::new()
            .with_primary_key("student")
            .parse_str(r#"[{"student": "a", "embedding": [1]}, {"name": "b", "embedding": [2]}]"#)
            .unwrap_err();
        match err {
            Error::UnknownPrimaryKey { column, record } => {
                assert_eq!(column, "student");
                assert_eq!(record, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn envelope_mode_is_checked() {
        let doc = SourceConfig::new()
            .parse_str(r#"{"mode": "TFIDF", "embeddings": {"a": [1], "b": [2]}}"#)
            .unwrap();
        assert_eq!(doc.mode, Some(EmbeddingMode::Tfidf));

        let err = SourceConfig::new()
            .parse_str(r#"{"mode": "word2vec", "embeddings": {"a": [1]}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode { ref mode } if mode == "word2vec"));
    }

    #[test]
    fn mode_marks_an_envelope_even_when_empty() {
        let err = SourceConfig::new()
            .parse_str(r#"{"mode": "word2vec", "embeddings": []}"#)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMode { ref mode } if mode == "word2vec"));

        let err = SourceConfig::new()
            .parse_str(r#"{"mode": "bert", "embeddings": []}"#)
            .unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn bare_mapping_may_contain_an_embeddings_key() {
        let doc = SourceConfig::new()
            .parse_str(r#"{"embeddings": [1, 2], "other": [3, 4]}"#)
            .unwrap();
        assert_eq!(keys(&doc), vec!["embeddings", "other"]);
    }

    #[test]
    fn empty_or_malformed_sources_are_rejected() {
        let config = SourceConfig::new();
        assert!(matches!(config.parse_str("{}"), Err(Error::EmptyInput)));
        assert!(matches!(config.parse_str("[]"), Err(Error::EmptyInput)));
        assert!(matches!(config.parse_str("42"), Err(Error::MalformedSource { .. })));
        assert!(matches!(
            config.parse_str(r#"{"a": [1, null]}"#),
            Err(Error::MalformedSource { record: 0, .. })
        ));
        assert!(matches!(config.parse_str("{"), Err(Error::Json(_))));
    }

    #[test]
    fn mode_display_round_trips() {
        for mode in [EmbeddingMode::Tfidf, EmbeddingMode::Bert] {
            assert_eq!(mode.to_string().parse::<EmbeddingMode>().unwrap(), mode);
        }
    }
}
