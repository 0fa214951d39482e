use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::backend::Backend;
use crate::document::{self, DocId, Entity, Stored};
use crate::query::{Filter, Query};
use crate::Result;

/// Typed view over one collection.
pub struct Collection<T> {
    backend: Arc<dyn Backend>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Collection<T> {
    pub(crate) fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            _entity: PhantomData,
        }
    }

    pub async fn find(&self, query: Query) -> Result<Vec<Stored<T>>> {
        self.backend
            .find(T::COLLECTION, &query)
            .await?
            .into_iter()
            .map(Stored::from_record)
            .collect()
    }

    pub async fn find_one(&self, filter: Filter) -> Result<Option<Stored<T>>> {
        self.backend
            .find_one(T::COLLECTION, &filter)
            .await?
            .map(Stored::from_record)
            .transpose()
    }

    pub async fn find_by_id(&self, id: &DocId) -> Result<Option<Stored<T>>> {
        self.find_one(Filter::id(id)).await
    }

    /// Persist a new document; the store assigns id and timestamps.
    pub async fn create(&self, doc: &T) -> Result<Stored<T>> {
        let record = document::to_record(doc)?;
        let stored = self.backend.insert(T::COLLECTION, record).await?;
        Stored::from_record(stored)
    }

    /// Set the fields present in `patch`; `None` when no document has this id.
    pub async fn update_by_id<P>(&self, id: &DocId, patch: &P) -> Result<Option<Stored<T>>>
    where
        P: Serialize + ?Sized,
    {
        let set = document::to_record(patch)?;
        self.backend
            .update_one(T::COLLECTION, &Filter::id(id), set, false)
            .await?
            .map(Stored::from_record)
            .transpose()
    }

    /// Update the first document matching `filter`, creating it when absent.
    pub async fn upsert<P>(&self, filter: Filter, patch: &P) -> Result<Stored<T>>
    where
        P: Serialize + ?Sized,
    {
        let set = document::to_record(patch)?;
        let stored = self
            .backend
            .update_one(T::COLLECTION, &filter, set, true)
            .await?
            .ok_or_else(|| crate::StoreError::Database("upsert returned no document".into()))?;
        Stored::from_record(stored)
    }

    pub async fn delete_by_id(&self, id: &DocId) -> Result<bool> {
        self.backend.delete_one(T::COLLECTION, &Filter::id(id)).await
    }

    pub async fn delete_many(&self, filter: Filter) -> Result<u64> {
        self.backend.delete_many(T::COLLECTION, &filter).await
    }
}
