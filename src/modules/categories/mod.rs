pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use utoipa::OpenApi;

use folio_kernel::Module;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::list_categories,
        routes::admin_list_categories,
        routes::create_category,
        routes::get_category,
        routes::update_category,
        routes::delete_category,
    ),
    components(schemas(models::Category, models::CategoryInput))
)]
struct CategoriesApi;

pub struct CategoriesModule {
    state: AppState,
}

impl CategoriesModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/categories", get(routes::list_categories))
            .route(
                "/admin/categories",
                get(routes::admin_list_categories).post(routes::create_category),
            )
            .route(
                "/admin/categories/{id}",
                get(routes::get_category)
                    .put(routes::update_category)
                    .delete(routes::delete_category),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(CategoriesApi::openapi()).ok()
    }
}

pub fn create_module(state: AppState) -> Arc<dyn Module> {
    Arc::new(CategoriesModule::new(state))
}
