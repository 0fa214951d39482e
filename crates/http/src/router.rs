//! Router builder for the Folio HTTP server

use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::{Timestamp, Uuid};

use folio_kernel::ModuleRegistry;

use utoipa::PartialSchema;

use crate::error::{AppError, ErrorResponse};

/// Middleware chosen on the builder; applied in [`RouterBuilder::build`] so it
/// wraps every route regardless of call order.
#[derive(Default)]
struct Middleware {
    tracing: bool,
    cors: bool,
    request_id: bool,
    timeout: Option<Duration>,
    body_limit: Option<usize>,
}

/// Builder for constructing the main HTTP router
pub struct RouterBuilder {
    router: Router,
    modules: Router,
    base_path: String,
    middleware: Middleware,
}

impl RouterBuilder {
    /// Create a new router builder. Module routes are mounted under `base_path`.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            router: Router::new(),
            modules: Router::new(),
            base_path: base_path.into(),
            middleware: Middleware::default(),
        }
    }

    /// Add a route at the server root
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Merge a module's router into the API surface
    pub fn mount_module(mut self, module_router: Router) -> Self {
        self.modules = self.modules.merge(module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.middleware.tracing = true;
        self
    }

    /// Add CORS middleware
    pub fn with_cors(mut self) -> Self {
        self.middleware.cors = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.middleware.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.middleware.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Cap request bodies, uploads included
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.middleware.body_limit = Some(bytes);
        self
    }

    /// Add OpenAPI documentation by collecting specs from all modules
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let openapi_spec = merged_openapi(registry, &self.base_path);

        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "merged OpenAPI document did not parse; serving a stub");
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Folio API")
                            .version(env!("CARGO_PKG_VERSION"))
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw JSON for external consumers
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router
    pub fn build(self) -> Router {
        let mut router = if self.base_path.is_empty() {
            self.router.merge(self.modules)
        } else {
            self.router.nest(&self.base_path, self.modules)
        };

        router = router
            .method_not_allowed_fallback(method_not_allowed)
            .fallback(not_found);

        let middleware = self.middleware;
        if let Some(bytes) = middleware.body_limit {
            router = router.layer(DefaultBodyLimit::max(bytes));
        }
        if let Some(timeout) = middleware.timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }
        if middleware.cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }
        if middleware.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(false))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }
        if middleware.request_id {
            // Outermost, so the trace span already sees the id.
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));
        }

        router
    }
}

fn merged_openapi(registry: &ModuleRegistry, base_path: &str) -> serde_json::Value {
    let mut openapi_spec = serde_json::json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Folio API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Publisher catalogue and admin content API"
        },
        "paths": {},
        "components": {
            "schemas": {},
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }
        }
    });

    if let Ok(schema) = serde_json::to_value(<ErrorResponse as PartialSchema>::schema()) {
        openapi_spec["components"]["schemas"]["ErrorResponse"] = schema;
    }

    openapi_spec["paths"]["/healthz"] = serde_json::json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": { "text/plain": { "schema": { "type": "string" } } }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
            for (path, path_item) in paths {
                let prefixed_path = format!("{}{}", base_path, path);
                openapi_spec["paths"][prefixed_path] = path_item.clone();
            }
        }

        if let Some(schemas) = module_spec
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(|s| s.as_object())
        {
            for (schema_name, schema_def) in schemas {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

async fn not_found() -> AppError {
    AppError::not_found("route not found")
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Request ID generator for tracing
#[derive(Clone)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
