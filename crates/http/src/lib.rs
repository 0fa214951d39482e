//! HTTP server facade for Folio with Axum, error handling, and OpenAPI support.

use std::future::Future;

use anyhow::Context;
use axum::{routing::get, Router};

use folio_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod extract;
pub mod router;

pub use error::{AppError, ErrorResponse};
pub use extract::{AdminSession, ApiJson};
use router::RouterBuilder;

/// Serve every registered module until `shutdown` resolves.
pub async fn start_server<F>(
    registry: &ModuleRegistry,
    settings: &Settings,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(registry, settings);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!(
        "HTTP server listening on http://{}{}",
        addr,
        settings.server.base_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut router_builder = RouterBuilder::new(settings.server.base_path.clone())
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .with_body_limit(settings.server.body_limit_bytes)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        tracing::debug!(
            module = module.name(),
            base_path = %settings.server.base_path,
            "mounting module routes"
        );
        router_builder = router_builder.mount_module(module.routes());
    }

    router_builder.with_openapi(registry).build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}
