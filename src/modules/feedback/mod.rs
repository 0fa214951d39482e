pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;

use folio_kernel::Module;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::submit_contact,
        routes::list_feedbacks,
        routes::mark_read,
        routes::delete_feedbacks,
    ),
    components(schemas(
        models::Feedback,
        models::ContactInput,
        models::ContactAccepted,
        models::ReadFlag
    ))
)]
struct FeedbackApi;

/// Public contact form and the admin inbox behind it.
pub struct FeedbackModule {
    state: AppState,
}

impl FeedbackModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for FeedbackModule {
    fn name(&self) -> &'static str {
        "feedback"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/contact", post(routes::submit_contact))
            .route(
                "/admin/feedbacks",
                get(routes::list_feedbacks)
                    .put(routes::mark_read)
                    .delete(routes::delete_feedbacks),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        serde_json::to_value(FeedbackApi::openapi()).ok()
    }
}

pub fn create_module(state: AppState) -> Arc<dyn Module> {
    Arc::new(FeedbackModule::new(state))
}
