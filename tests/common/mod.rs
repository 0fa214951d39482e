#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use folio_app::{modules, App, AppState};
use folio_authz::AuthGuard;
use folio_db::Store;
use folio_kernel::Settings;
use folio_media::{MediaError, MediaHost, UploadFile, Uploaded, Unconfigured};

pub const SECRET: &str = "correct-horse";

/// Media host that accepts everything and remembers what it got.
#[derive(Default)]
pub struct RecordingHost {
    pub seen: Mutex<Vec<UploadFile>>,
}

#[async_trait]
impl MediaHost for RecordingHost {
    async fn upload(&self, file: UploadFile) -> Result<Uploaded, MediaError> {
        let url = format!("https://cdn.test/studyhub_publication/{}", file.file_name);
        let raw = serde_json::json!({ "secure_url": url, "bytes": file.bytes.len() });
        self.seen.lock().unwrap().push(file);
        Ok(Uploaded { url, raw })
    }
}

pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.admin_secret = Some(SECRET.to_string());
    settings
}

pub fn app_with(store: Store, media: Arc<dyn MediaHost>) -> Router {
    let settings = settings();
    let guard = AuthGuard::from_settings(&settings.auth);
    App::with_state(settings, AppState::new(store, guard, media)).router()
}

/// Full router over a fresh in-memory store.
pub fn memory_app() -> Router {
    app_with(Store::in_memory(modules::indexes()), Arc::new(Unconfigured))
}

/// Full router with no store configured.
pub fn sample_app() -> Router {
    app_with(Store::unconfigured(), Arc::new(Unconfigured))
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    into_reply(app.clone().oneshot(request).await.unwrap()).await
}

pub async fn send_raw(app: &Router, request: Request<Body>) -> Reply {
    into_reply(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_reply(response: axum::response::Response) -> Reply {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Reply { status, body }
}

pub async fn get(app: &Router, uri: &str) -> Reply {
    send(app, "GET", uri, None, None).await
}

/// Log in through the API and return the bearer token.
pub async fn login(app: &Router) -> String {
    let reply = send(
        app,
        "POST",
        "/admin/login",
        None,
        Some(serde_json::json!({ "secret": SECRET })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.body);
    reply.body["token"].as_str().unwrap().to_string()
}

/// Create through the admin API and return the stored document.
pub async fn create(app: &Router, token: &str, uri: &str, body: Value) -> Value {
    let reply = send(app, "POST", uri, Some(token), Some(body)).await;
    assert_eq!(reply.status, StatusCode::CREATED, "create failed: {}", reply.body);
    reply.body
}

pub fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|doc| doc["_id"].as_str().unwrap().to_string())
        .collect()
}
