//! Request extractors shared by every module.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::JsonRejection, FromRef, FromRequest, FromRequestParts, OptionalFromRequest,
        Request,
    },
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
    },
    Json,
};
use serde::de::DeserializeOwned;

use folio_authz::{AdminClaims, AuthGuard};

use crate::error::AppError;

/// Proof that the request carried a valid admin bearer token.
///
/// Handlers that take this extractor reject missing, malformed, expired, and
/// foreign tokens with 401 before their body runs.
#[derive(Debug, Clone)]
pub struct AdminSession(pub AdminClaims);

impl<S> FromRequestParts<S> for AdminSession
where
    Arc<AuthGuard>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let guard = Arc::<AuthGuard>::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match guard.verify_header(header) {
            Some(claims) => Ok(AdminSession(claims)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "rejected admin request");
                Err(AppError::unauthorized())
            }
        }
    }
}

/// `Json` whose rejections use the application error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match <Json<T> as FromRequest<S>>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// `Option<ApiJson<T>>` is `None` when the request carries no body type at all.
impl<T, S> OptionalFromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        if !req.headers().contains_key(CONTENT_TYPE) {
            return Ok(None);
        }
        <Self as FromRequest<S>>::from_request(req, state)
            .await
            .map(Some)
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}
