//! Process-wide handle to the document store.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use folio_kernel::settings::DatabaseSettings;

use crate::backend::Backend;
use crate::collection::Collection;
use crate::document::{Entity, IndexSpec};
use crate::memory::MemoryBackend;
use crate::mongo::MongoBackend;
use crate::{Result, StoreError};

/// Outcome of [`Store::connect`].
#[derive(Clone)]
pub enum Connection {
    Live(Database),
    /// No connection string is configured.
    Unavailable,
}

/// Live connection to a backend.
#[derive(Clone)]
pub struct Database {
    backend: Arc<dyn Backend>,
}

impl Database {
    pub fn collection<T: Entity>(&self) -> Collection<T> {
        Collection::new(self.backend.clone())
    }

    pub fn kind(&self) -> &'static str {
        self.backend.kind()
    }
}

enum Source {
    Unconfigured,
    Mongo { uri: String, name: String },
    Ready(Arc<dyn Backend>),
}

struct Inner {
    source: Source,
    indexes: Vec<IndexSpec>,
    cell: OnceCell<Database>,
}

/// Lazily connected store shared by every request.
///
/// The first caller of [`Store::connect`] opens the connection and applies the
/// declared indexes; concurrent first callers wait on that same attempt. A failed
/// attempt is returned to its callers and the next call starts a new one.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

impl Store {
    fn with_source(source: Source, indexes: Vec<IndexSpec>) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                indexes,
                cell: OnceCell::new(),
            }),
        }
    }

    /// MongoDB when a URI is configured, otherwise permanently unavailable.
    pub fn from_settings(settings: &DatabaseSettings, indexes: Vec<IndexSpec>) -> Self {
        let source = match settings.configured_uri() {
            Some(uri) => Source::Mongo {
                uri: uri.to_string(),
                name: settings.name.clone(),
            },
            None => Source::Unconfigured,
        };
        Self::with_source(source, indexes)
    }

    pub fn unconfigured() -> Self {
        Self::with_source(Source::Unconfigured, Vec::new())
    }

    /// Store over an already constructed backend.
    pub fn with_backend(backend: Arc<dyn Backend>, indexes: Vec<IndexSpec>) -> Self {
        Self::with_source(Source::Ready(backend), indexes)
    }

    /// Fresh in-memory store.
    pub fn in_memory(indexes: Vec<IndexSpec>) -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()), indexes)
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self.inner.source, Source::Unconfigured)
    }

    pub async fn connect(&self) -> Result<Connection> {
        if let Source::Unconfigured = self.inner.source {
            return Ok(Connection::Unavailable);
        }

        let database = self
            .inner
            .cell
            .get_or_try_init(|| self.open())
            .await?;
        Ok(Connection::Live(database.clone()))
    }

    /// Like [`Store::connect`], but an unconfigured store is an error.
    pub async fn require(&self) -> Result<Database> {
        match self.connect().await? {
            Connection::Live(database) => Ok(database),
            Connection::Unavailable => Err(StoreError::Unavailable),
        }
    }

    async fn open(&self) -> Result<Database> {
        let backend: Arc<dyn Backend> = match &self.inner.source {
            Source::Unconfigured => return Err(StoreError::Unavailable),
            Source::Mongo { uri, name } => Arc::new(MongoBackend::connect(uri, name).await?),
            Source::Ready(backend) => backend.clone(),
        };

        for index in &self.inner.indexes {
            if let Err(error) = backend.ensure_index(index).await {
                warn!(
                    collection = index.collection,
                    field = index.field,
                    %error,
                    "failed to ensure index"
                );
            }
        }

        info!(backend = backend.kind(), "document store ready");
        Ok(Database { backend })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, Query};
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        name: String,
    }

    impl Entity for Tag {
        const COLLECTION: &'static str = "tags";

        fn indexes() -> Vec<IndexSpec> {
            vec![IndexSpec::unique(Self::COLLECTION, "name")]
        }
    }

    /// Counts how often the store asks for indexes, i.e. how often it opened.
    struct CountingBackend {
        inner: MemoryBackend,
        opens: AtomicUsize,
    }

    #[async_trait]
    impl Backend for CountingBackend {
        fn kind(&self) -> &'static str {
            "counting"
        }

        async fn ensure_index(&self, index: &IndexSpec) -> Result<()> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.ensure_index(index).await
        }

        async fn find(&self, c: &str, q: &Query) -> Result<Vec<crate::Record>> {
            self.inner.find(c, q).await
        }

        async fn find_one(&self, c: &str, f: &Filter) -> Result<Option<crate::Record>> {
            self.inner.find_one(c, f).await
        }

        async fn insert(&self, c: &str, r: crate::Record) -> Result<crate::Record> {
            self.inner.insert(c, r).await
        }

        async fn update_one(
            &self,
            c: &str,
            f: &Filter,
            s: crate::Record,
            u: bool,
        ) -> Result<Option<crate::Record>> {
            self.inner.update_one(c, f, s, u).await
        }

        async fn delete_one(&self, c: &str, f: &Filter) -> Result<bool> {
            self.inner.delete_one(c, f).await
        }

        async fn delete_many(&self, c: &str, f: &Filter) -> Result<u64> {
            self.inner.delete_many(c, f).await
        }
    }

    #[tokio::test]
    async fn unconfigured_store_reports_unavailable() {
        let store = Store::from_settings(&DatabaseSettings::default(), Vec::new());
        assert!(!store.is_configured());
        assert!(matches!(store.connect().await.unwrap(), Connection::Unavailable));
        assert!(matches!(store.require().await, Err(StoreError::Unavailable)));
    }

    #[tokio::test]
    async fn concurrent_first_callers_share_one_open() {
        let backend = Arc::new(CountingBackend {
            inner: MemoryBackend::new(),
            opens: AtomicUsize::new(0),
        });
        let store = Store::with_backend(backend.clone(), Tag::indexes());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.require().await.map(|_| ()) })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        store.require().await.unwrap();

        assert_eq!(backend.opens.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn typed_collection_round_trip() {
        let store = Store::in_memory(Tag::indexes());
        let tags = store.require().await.unwrap().collection::<Tag>();

        let created = tags.create(&Tag { name: "fiction".into() }).await.unwrap();
        assert!(created.created_at.is_some());

        let id = crate::DocId::parse(&created.id).unwrap();
        let fetched = tags.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.doc, created.doc);

        let duplicate = tags.create(&Tag { name: "fiction".into() }).await;
        assert!(matches!(duplicate, Err(StoreError::Duplicate { .. })));

        let renamed = tags
            .update_by_id(&id, &serde_json::json!({"name": "poetry"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.doc.name, "poetry");

        assert!(tags.delete_by_id(&id).await.unwrap());
        assert!(tags.find_by_id(&id).await.unwrap().is_none());
    }
}
