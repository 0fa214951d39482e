//! Document shapes shared by every backend.
//!
//! Backends exchange untyped [`Record`]s (JSON objects). The typed layer wraps an
//! entity in [`Stored`], which adds the store-managed id and timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Field holding the document identifier.
pub const ID_FIELD: &str = "_id";
/// Field stamped on insert.
pub const CREATED_AT: &str = "createdAt";
/// Field stamped on insert and on every update.
pub const UPDATED_AT: &str = "updatedAt";

/// Untyped document as exchanged with a backend.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Identifier in the store's accepted format: a 24 character hex ObjectId.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocId(String);

impl DocId {
    /// Parse an identifier, returning `None` when it is not a well-formed ObjectId.
    pub fn parse(raw: &str) -> Option<Self> {
        bson::oid::ObjectId::parse_str(raw)
            .ok()
            .map(|oid| Self(oid.to_hex()))
    }

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(bson::oid::ObjectId::new().to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique index declared by an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub field: &'static str,
    pub unique: bool,
}

impl IndexSpec {
    pub const fn unique(collection: &'static str, field: &'static str) -> Self {
        Self {
            collection,
            field,
            unique: true,
        }
    }
}

/// A document type persisted in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name
    const COLLECTION: &'static str;

    /// Indexes to ensure once a connection is established
    fn indexes() -> Vec<IndexSpec> {
        Vec::new()
    }
}

/// An entity together with its store-managed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub doc: T,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Stored<T> {
    /// Wrap a document that never touched a store (sample data).
    pub fn detached(id: impl Into<String>, doc: T) -> Self {
        Self {
            id: id.into(),
            doc,
            created_at: None,
            updated_at: None,
        }
    }
}

impl<T: DeserializeOwned> Stored<T> {
    pub(crate) fn from_record(record: Record) -> crate::Result<Self> {
        Ok(serde_json::from_value(serde_json::Value::Object(record))?)
    }
}

/// Serialize a value into a record, rejecting anything that is not a JSON object.
pub(crate) fn to_record<T: Serialize + ?Sized>(value: &T) -> crate::Result<Record> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(crate::StoreError::Encoding(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Timestamp in the textual form records carry.
pub(crate) fn timestamp(at: DateTime<Utc>) -> serde_json::Value {
    serde_json::Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        text: String,
    }

    #[test]
    fn doc_id_accepts_object_ids_only() {
        assert!(DocId::parse("64b7f0c2a1b2c3d4e5f60718").is_some());
        assert!(DocId::parse("1").is_none());
        assert!(DocId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        assert!(DocId::parse("").is_none());
    }

    #[test]
    fn generated_ids_parse_back() {
        let id = DocId::generate();
        assert_eq!(DocId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn stored_flattens_entity_fields() {
        let stored = Stored::detached("abc", Note { text: "hi".into() });
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value, serde_json::json!({"_id": "abc", "text": "hi"}));
    }

    #[test]
    fn stored_reads_timestamps() {
        let record = to_record(&serde_json::json!({
            "_id": "abc",
            "text": "hi",
            "createdAt": "2024-05-01T10:00:00.000000Z",
            "extra": true
        }))
        .unwrap();
        let stored = Stored::<Note>::from_record(record).unwrap();
        assert_eq!(stored.doc.text, "hi");
        assert!(stored.created_at.is_some());
        assert!(stored.updated_at.is_none());
    }

    #[test]
    fn to_record_rejects_non_objects() {
        assert!(to_record(&42).is_err());
    }
}
