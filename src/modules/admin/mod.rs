pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;

use folio_kernel::{InitCtx, Module};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(routes::login, routes::verify, routes::upload),
    components(schemas(
        models::LoginInput,
        models::LoginIssued,
        models::VerifyResult,
        models::UploadResult
    ))
)]
struct AdminApi;

/// Admin session endpoints and image upload.
pub struct AdminModule {
    state: AppState,
}

impl AdminModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for AdminModule {
    fn name(&self) -> &'static str {
        "admin"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let media = &ctx.settings.media;
        if media.cloud_name.is_none() {
            tracing::warn!(module = self.name(), "no media host configured; uploads will fail");
        } else {
            tracing::info!(
                module = self.name(),
                folder = %media.folder,
                "image uploads enabled"
            );
        }
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/admin/login", post(routes::login))
            .route("/admin/verify", get(routes::verify))
            .route("/admin/upload", post(routes::upload))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(AdminApi::openapi()).ok()
    }
}

pub fn create_module(state: AppState) -> Arc<dyn Module> {
    Arc::new(AdminModule::new(state))
}
