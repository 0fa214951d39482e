use async_trait::async_trait;
use folio_kernel::{InitCtx, Module};

use crate::store::Store;

/// Core module reporting the store's availability at startup.
pub struct DatabaseModule {
    store: Store,
}

impl DatabaseModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if self.store.is_configured() {
            tracing::info!(
                module = self.name(),
                database = %ctx.settings.database.name,
                "document store configured; connecting on first use"
            );
        } else {
            tracing::warn!(
                module = self.name(),
                "no database URI configured; public reads serve sample data and writes will fail"
            );
        }
        Ok(())
    }
}
