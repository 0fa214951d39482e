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
        routes::list_active,
        routes::admin_list,
        routes::create_item,
        routes::get_item,
        routes::update_item,
        routes::delete_item,
    ),
    components(schemas(models::CarouselItem, models::CarouselInput))
)]
struct CarouselApi;

pub struct CarouselModule {
    state: AppState,
}

impl CarouselModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for CarouselModule {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/carousel", get(routes::list_active))
            .route(
                "/admin/carousel",
                get(routes::admin_list).post(routes::create_item),
            )
            .route(
                "/admin/carousel/{id}",
                get(routes::get_item)
                    .put(routes::update_item)
                    .delete(routes::delete_item),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(CarouselApi::openapi()).ok()
    }
}

pub fn create_module(state: AppState) -> Arc<dyn Module> {
    Arc::new(CarouselModule::new(state))
}
