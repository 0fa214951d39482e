use async_trait::async_trait;

use crate::document::{IndexSpec, Record};
use crate::query::{Filter, Query};
use crate::Result;

/// Raw document operations a storage engine provides.
///
/// Implementations stamp `_id`, `createdAt`, and `updatedAt`; callers never
/// supply them. Timestamps come back as RFC 3339 strings and ids as hex strings.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs
    fn kind(&self) -> &'static str;

    /// Create the index if it does not exist yet
    async fn ensure_index(&self, index: &IndexSpec) -> Result<()>;

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Record>>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Record>>;

    /// Insert a new document and return it as stored
    async fn insert(&self, collection: &str, record: Record) -> Result<Record>;

    /// Set the given fields on the first matching document and return it after the
    /// update. With `upsert`, a missing document is created from the filter's
    /// equality fields plus `set`.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Record,
        upsert: bool,
    ) -> Result<Option<Record>>;

    /// Returns whether a document was removed
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool>;

    /// Returns how many documents were removed
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64>;
}
