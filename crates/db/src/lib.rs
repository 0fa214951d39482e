//! Document store adapter for Folio.
//!
//! [`Store`] owns the single lazily opened connection; [`Collection`] gives typed
//! access per [`Entity`]. MongoDB backs production, [`MemoryBackend`] backs tests
//! and local runs.

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod memory;
pub mod module;
pub mod mongo;
pub mod query;
pub mod store;

pub use backend::Backend;
pub use collection::Collection;
pub use document::{DocId, Entity, IndexSpec, Record, Stored};
pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
pub use module::DatabaseModule;
pub use query::{Direction, Filter, Query};
pub use store::{Connection, Database, Store};
