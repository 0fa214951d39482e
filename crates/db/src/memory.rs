//! In-process backend used by tests and by local runs without MongoDB.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::backend::Backend;
use crate::document::{self, DocId, IndexSpec, Record, CREATED_AT, ID_FIELD, UPDATED_AT};
use crate::query::{Filter, Query};
use crate::{Result, StoreError};

#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    collections: HashMap<String, Vec<Record>>,
    indexes: Vec<IndexSpec>,
    last_stamp: Option<DateTime<Utc>>,
}

impl State {
    /// Strictly increasing timestamps so creation order is always recoverable.
    fn next_stamp(&mut self) -> Value {
        let mut now = Utc::now().trunc_subsecs(6);
        if let Some(last) = self.last_stamp {
            if now <= last {
                now = last + chrono::Duration::microseconds(1);
            }
        }
        self.last_stamp = Some(now);
        document::timestamp(now)
    }

    fn check_unique(&self, collection: &str, candidate: &Record) -> Result<()> {
        let docs = match self.collections.get(collection) {
            Some(docs) => docs,
            None => return Ok(()),
        };

        for index in self
            .indexes
            .iter()
            .filter(|index| index.unique && index.collection == collection)
        {
            let value = match candidate.get(index.field) {
                Some(Value::Null) | None => continue,
                Some(value) => value,
            };
            let clash = docs.iter().any(|doc| {
                doc.get(ID_FIELD) != candidate.get(ID_FIELD) && doc.get(index.field) == Some(value)
            });
            if clash {
                return Err(StoreError::Duplicate {
                    field: index.field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn insert(&mut self, collection: &str, mut record: Record) -> Result<Record> {
        let stamp = self.next_stamp();
        record.insert(ID_FIELD.to_string(), Value::String(DocId::generate().to_string()));
        record.insert(CREATED_AT.to_string(), stamp.clone());
        record.insert(UPDATED_AT.to_string(), stamp);

        self.check_unique(collection, &record)?;
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn ensure_index(&self, index: &IndexSpec) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.indexes.contains(index) {
            state.indexes.push(index.clone());
        }
        Ok(())
    }

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Record>> {
        let state = self.state.read().await;
        let mut docs: Vec<Record> = state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| query.filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        docs.sort_by(|a, b| query.compare(a, b));
        if let Some(limit) = query.limit {
            docs.truncate(limit);
        }
        Ok(docs)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Record>> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn insert(&self, collection: &str, record: Record) -> Result<Record> {
        self.state.write().await.insert(collection, record)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Record,
        upsert: bool,
    ) -> Result<Option<Record>> {
        let mut state = self.state.write().await;

        let position = state
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().position(|doc| filter.matches(doc)));

        match position {
            Some(position) => {
                let stamp = state.next_stamp();
                let mut updated = state.collections[collection][position].clone();
                for (field, value) in set {
                    if field != ID_FIELD && field != CREATED_AT {
                        updated.insert(field, value);
                    }
                }
                updated.insert(UPDATED_AT.to_string(), stamp);

                state.check_unique(collection, &updated)?;
                if let Some(docs) = state.collections.get_mut(collection) {
                    docs[position] = updated.clone();
                }
                Ok(Some(updated))
            }
            None if upsert => {
                let mut record: Record = filter
                    .equalities()
                    .into_iter()
                    .filter(|(field, _)| *field != ID_FIELD)
                    .map(|(field, value)| (field.to_string(), value.clone()))
                    .collect();
                record.extend(set);
                state.insert(collection, record).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(docs) = state.collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(position) => {
                docs.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64> {
        let mut state = self.state.write().await;
        let Some(docs) = state.collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }
}
