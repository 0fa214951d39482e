use anyhow::anyhow;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};

use folio_db::{Collection, Connection, StoreError, Stored};
use folio_http::{AdminSession, ApiJson, AppError, ErrorResponse};

use super::models::{home, Setting, SettingsInput};
use crate::state::AppState;
use crate::utils::collection;

#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Home page settings, created with defaults on first read", body = Setting)
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> Result<Response, AppError> {
    match state.store.connect().await? {
        Connection::Live(db) => {
            let settings = load_or_create(&db.collection::<Setting>()).await?;
            Ok(Json(settings).into_response())
        }
        Connection::Unavailable => Ok(Json(Setting::home_default()).into_response()),
    }
}

#[utoipa::path(
    put,
    path = "/admin/settings",
    tag = "admin",
    request_body = SettingsInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated settings", body = Setting),
        (status = 400, description = "Title or description missing", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn update_settings(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SettingsInput>,
) -> Result<Json<Stored<Setting>>, AppError> {
    let patch = input.into_patch()?;
    let settings = collection::<Setting>(&state.store).await?;

    let updated = settings.upsert(home(), &patch).await?;
    tracing::info!(id = %updated.id, "home settings updated");

    Ok(Json(updated))
}

/// The home document, inserting the defaults when absent. Losing an insert race
/// to another request just means reading what it wrote.
async fn load_or_create(settings: &Collection<Setting>) -> Result<Stored<Setting>, AppError> {
    if let Some(existing) = settings.find_one(home()).await? {
        return Ok(existing);
    }

    match settings.create(&Setting::home_default()).await {
        Ok(created) => {
            tracing::info!(id = %created.id, "default home settings created");
            Ok(created)
        }
        Err(StoreError::Duplicate { .. }) => settings
            .find_one(home())
            .await?
            .ok_or_else(|| AppError::Internal(anyhow!("home settings missing after duplicate insert"))),
        Err(e) => Err(e.into()),
    }
}
