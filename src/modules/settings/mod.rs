pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, put},
    Router,
};
use utoipa::OpenApi;

use folio_kernel::Module;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(routes::get_settings, routes::update_settings),
    components(schemas(models::Setting, models::SettingsInput))
)]
struct SettingsApi;

pub struct SettingsModule {
    state: AppState,
}

impl SettingsModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for SettingsModule {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/settings", get(routes::get_settings))
            .route("/admin/settings", put(routes::update_settings))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(SettingsApi::openapi()).ok()
    }
}

pub fn create_module(state: AppState) -> Arc<dyn Module> {
    Arc::new(SettingsModule::new(state))
}
