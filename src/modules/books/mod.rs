pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use utoipa::OpenApi;

use folio_kernel::{InitCtx, Module};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::list_books,
        routes::get_book,
        routes::admin_list_books,
        routes::create_book,
        routes::admin_get_book,
        routes::update_book,
        routes::delete_book,
    ),
    components(schemas(models::Book, models::BookInput))
)]
struct BooksApi;

/// Public catalogue reads and admin book CRUD.
pub struct BooksModule {
    state: AppState,
}

impl BooksModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            sample_fallback = !self.state.store.is_configured(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/books", get(routes::list_books))
            .route("/books/{id}", get(routes::get_book))
            .route(
                "/admin/books",
                get(routes::admin_list_books).post(routes::create_book),
            )
            .route(
                "/admin/books/{id}",
                get(routes::admin_get_book)
                    .put(routes::update_book)
                    .delete(routes::delete_book),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(BooksApi::openapi()).ok()
    }
}

pub fn create_module(state: AppState) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(state))
}
