use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use folio_http::{AdminSession, ApiJson, AppError, ErrorResponse};
use folio_media::UploadFile;

use super::models::{LoginInput, LoginIssued, UploadResult, VerifyResult, FILE_FIELDS};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "admin",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Token issued", body = LoginIssued),
        (status = 400, description = "No secret submitted", body = ErrorResponse),
        (status = 401, description = "Wrong secret", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<LoginIssued>, AppError> {
    let secret = input
        .secret
        .filter(|secret| !secret.is_empty())
        .ok_or_else(|| AppError::invalid_field("secret", "secret required"))?;

    let token = state.guard.login(&secret).inspect_err(|error| {
        tracing::warn!(%error, "admin login refused");
    })?;
    tracing::info!("admin logged in");

    Ok(Json(LoginIssued { ok: true, token }))
}

#[utoipa::path(
    get,
    path = "/admin/verify",
    tag = "admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Token is valid; claims attached", body = VerifyResult),
        (status = 401, description = "Token missing, malformed, expired or foreign", body = VerifyResult)
    )
)]
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.guard.verify_header(header) {
        Some(claims) => Json(VerifyResult {
            valid: true,
            data: Some(claims),
        })
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(VerifyResult {
                valid: false,
                data: None,
            }),
        )
            .into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/admin/upload",
    tag = "admin",
    request_body(content_type = "multipart/form-data", description = "Image in a `file` or `image` field"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Uploaded", body = UploadResult),
        (status = 400, description = "No file in the form", body = ErrorResponse),
        (status = 500, description = "Media host failure, provider message included", body = ErrorResponse)
    )
)]
pub async fn upload(
    _session: AdminSession,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>, AppError> {
    let mut multipart = multipart.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("multipart parsing error: {}", e);
        AppError::bad_request(e.body_text())
    })? {
        let field_name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&field_name.as_str()) {
            tracing::debug!(field = %field_name, "ignoring form field");
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        file = Some(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let file = file.ok_or_else(|| AppError::invalid_field("file", "no file uploaded"))?;
    let uploaded = state.media.upload(file).await?;
    tracing::info!(url = %uploaded.url, "image uploaded");

    Ok(Json(UploadResult {
        url: uploaded.url,
        raw: uploaded.raw,
    }))
}
