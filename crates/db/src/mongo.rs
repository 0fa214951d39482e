//! MongoDB backend.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, DateTime, Document};
use futures::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use serde_json::Value;
use tracing::info;

use crate::backend::Backend;
use crate::document::{IndexSpec, Record, CREATED_AT, ID_FIELD, UPDATED_AT};
use crate::query::{Direction, Filter, Query};
use crate::{Result, StoreError};

const DUPLICATE_KEY: i32 = 11000;

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoBackend {
    database: Database,
}

impl MongoBackend {
    /// Connect and verify the server answers a ping
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        info!(database = db_name, "connecting to MongoDB");

        // Bound server selection so an unreachable host fails the request quickly.
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| StoreError::Database(format!("failed to connect to MongoDB: {}", e)))?;

        let database = client.database(db_name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!(database = db_name, "connected to MongoDB");

        Ok(Self { database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl Backend for MongoBackend {
    fn kind(&self) -> &'static str {
        "mongodb"
    }

    async fn ensure_index(&self, index: &IndexSpec) -> Result<()> {
        let model = IndexModel::builder()
            .keys(doc! { index.field: 1 })
            .options(IndexOptions::builder().unique(index.unique).build())
            .build();

        self.collection(index.collection)
            .create_index(model)
            .await
            .map_err(|e| StoreError::Database(format!("failed to create index: {}", e)))?;
        Ok(())
    }

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Record>> {
        let coll = self.collection(collection);
        let mut action = coll
            .find(filter_document(&query.filter)?)
            .sort(sort_document(query));
        if let Some(limit) = find_limit(query) {
            action = action.limit(limit);
        }

        let docs: Vec<Document> = action.await.map_err(map_error)?.try_collect().await?;
        Ok(docs.into_iter().map(to_record).collect())
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        let found = self
            .collection(collection)
            .find_one(filter_document(filter)?)
            .await
            .map_err(map_error)?;
        Ok(found.map(to_record))
    }

    async fn insert(&self, collection: &str, record: Record) -> Result<Record> {
        let now = DateTime::now();
        let mut document = to_document(record)?;
        document.remove(ID_FIELD);
        document.insert(ID_FIELD, ObjectId::new());
        document.insert(CREATED_AT, now);
        document.insert(UPDATED_AT, now);

        self.collection(collection)
            .insert_one(&document)
            .await
            .map_err(map_error)?;
        Ok(to_record(document))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Record,
        upsert: bool,
    ) -> Result<Option<Record>> {
        let now = DateTime::now();
        let mut fields = to_document(set)?;
        fields.remove(ID_FIELD);
        fields.remove(CREATED_AT);
        fields.insert(UPDATED_AT, now);

        let updated = self
            .collection(collection)
            .find_one_and_update(
                filter_document(filter)?,
                doc! { "$set": fields, "$setOnInsert": { CREATED_AT: now } },
            )
            .upsert(upsert)
            .return_document(ReturnDocument::After)
            .await
            .map_err(map_error)?;
        Ok(updated.map(to_record))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool> {
        let result = self
            .collection(collection)
            .delete_one(filter_document(filter)?)
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let result = self
            .collection(collection)
            .delete_many(filter_document(filter)?)
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }
}

fn map_error(err: mongodb::error::Error) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(write)) = err.kind.as_ref() {
        if write.code == DUPLICATE_KEY {
            return StoreError::Duplicate {
                field: duplicate_field(&write.message),
            };
        }
    }
    if let ErrorKind::Command(command) = err.kind.as_ref() {
        if command.code == DUPLICATE_KEY {
            return StoreError::Duplicate {
                field: duplicate_field(&command.message),
            };
        }
    }
    StoreError::from(err)
}

/// Pull the field name out of `... dup key: { name: "Poetry" }`.
fn duplicate_field(message: &str) -> String {
    message
        .split("dup key: {")
        .nth(1)
        .and_then(|rest| rest.split(':').next())
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Translate a backend-neutral filter into a MongoDB query document.
pub(crate) fn filter_document(filter: &Filter) -> Result<Document> {
    Ok(match filter {
        Filter::All => Document::new(),
        Filter::Eq(field, value) => doc! { field.as_str(): field_value(field, value)? },
        Filter::Ne(field, value) => {
            doc! { field.as_str(): { "$ne": field_value(field, value)? } }
        }
        Filter::Search { fields, needle } => {
            let pattern = regex::escape(needle);
            let clauses: Vec<Bson> = fields
                .iter()
                .map(|field| {
                    Bson::Document(doc! {
                        field.as_str(): { "$regex": pattern.as_str(), "$options": "i" }
                    })
                })
                .collect();
            doc! { "$or": clauses }
        }
        Filter::And(filters) => {
            let clauses = filters
                .iter()
                .map(|f| filter_document(f).map(Bson::Document))
                .collect::<Result<Vec<_>>>()?;
            doc! { "$and": clauses }
        }
    })
}

/// Sort keys in query order; MongoDB honours the document's key order.
pub(crate) fn sort_document(query: &Query) -> Document {
    let mut sort = Document::new();
    for (field, direction) in &query.sort {
        let order = match direction {
            Direction::Asc => 1,
            Direction::Desc => -1,
        };
        sort.insert(field.clone(), order);
    }
    sort
}

fn find_limit(query: &Query) -> Option<i64> {
    query
        .limit
        .map(|limit| i64::try_from(limit).unwrap_or(i64::MAX))
}

/// `_id` values travel as hex strings and are stored as ObjectIds.
fn field_value(field: &str, value: &Value) -> Result<Bson> {
    if field == ID_FIELD {
        if let Some(oid) = value.as_str().and_then(|s| ObjectId::parse_str(s).ok()) {
            return Ok(Bson::ObjectId(oid));
        }
    }
    Ok(bson::to_bson(value)?)
}

fn to_document(record: Record) -> Result<Document> {
    Ok(bson::to_document(&Value::Object(record))?)
}

fn to_record(document: Document) -> Record {
    document
        .into_iter()
        .map(|(key, value)| (key, to_json(value)))
        .collect()
}

fn to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(at) => crate::document::timestamp(at.to_chrono()),
        other => other.into_relaxed_extjson(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_filters_become_object_ids() {
        let oid = ObjectId::new();
        let filter = Filter::eq(ID_FIELD, oid.to_hex());
        let document = filter_document(&filter).unwrap();
        assert_eq!(document.get_object_id(ID_FIELD).unwrap(), oid);
    }

    #[test]
    fn search_escapes_regex_metacharacters() {
        let filter = Filter::search(["title"], "C++ (intro)");
        let document = filter_document(&filter).unwrap();
        let clauses = document.get_array("$or").unwrap();
        let clause = clauses[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(clause.get_str("$regex").unwrap(), r"C\+\+ \(intro\)");
        assert_eq!(clause.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn conjunctions_nest() {
        let filter = Filter::eq("category", "Drama").and(Filter::ne("read", true));
        let document = filter_document(&filter).unwrap();
        assert_eq!(document.get_array("$and").unwrap().len(), 2);
    }

    #[test]
    fn find_options_keep_sort_order_and_limit() {
        let query = Query::all()
            .sort_by("order", Direction::Asc)
            .sort_by(CREATED_AT, Direction::Desc)
            .limit(1000);

        let sort = sort_document(&query);
        let keys: Vec<&str> = sort.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["order", CREATED_AT]);
        assert_eq!(sort.get_i32("order").unwrap(), 1);
        assert_eq!(sort.get_i32(CREATED_AT).unwrap(), -1);
        assert_eq!(find_limit(&query), Some(1000));

        let unbounded = Query::all();
        assert!(sort_document(&unbounded).is_empty());
        assert_eq!(find_limit(&unbounded), None);
    }

    #[test]
    fn documents_convert_to_plain_json() {
        let oid = ObjectId::new();
        let record = to_record(doc! {
            "_id": oid,
            "title": "A",
            "order": 2_i32,
            "createdAt": DateTime::from_millis(0),
        });
        assert_eq!(record["_id"], json!(oid.to_hex()));
        assert_eq!(record["order"], json!(2));
        assert_eq!(record["createdAt"], json!("1970-01-01T00:00:00.000000Z"));
    }

    #[test]
    fn duplicate_field_is_parsed_from_server_message() {
        let message = r#"E11000 duplicate key error collection: studyhub.categories index: name_1 dup key: { name: "Poetry" }"#;
        assert_eq!(duplicate_field(message), "name");
        assert_eq!(duplicate_field("something else"), "unknown");
    }
}
