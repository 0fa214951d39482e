use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use folio_db::{Connection, Filter, StoreError, Stored};
use folio_http::{AdminSession, ApiJson, AppError, ErrorResponse};

use super::models::{already_exists, list_query, Category, CategoryInput};
use crate::sample;
use crate::state::AppState;
use crate::utils::{collection, not_found, parse_id};

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories by name; sample data when no store is configured", body = [Category])
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<Category>>>, AppError> {
    match state.store.connect().await? {
        Connection::Live(db) => Ok(Json(db.collection::<Category>().find(list_query()).await?)),
        Connection::Unavailable => Ok(Json(sample::categories())),
    }
}

#[utoipa::path(
    get,
    path = "/admin/categories",
    tag = "admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Categories by name", body = [Category]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn admin_list_categories(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<Category>>>, AppError> {
    let categories = collection::<Category>(&state.store).await?;
    Ok(Json(categories.find(list_query()).await?))
}

#[utoipa::path(
    post,
    path = "/admin/categories",
    tag = "admin",
    request_body = CategoryInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Created", body = Category),
        (status = 400, description = "Name missing or already taken", body = ErrorResponse)
    )
)]
pub async fn create_category(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<(StatusCode, Json<Stored<Category>>), AppError> {
    let category = input.into_category()?;
    let categories = collection::<Category>(&state.store).await?;

    if categories
        .find_one(Filter::eq("name", category.name.as_str()))
        .await?
        .is_some()
    {
        return Err(already_exists());
    }

    // The unique index still catches a concurrent create of the same name.
    let created = categories.create(&category).await.map_err(duplicate_name)?;
    tracing::info!(id = %created.id, name = %created.doc.name, "category created");

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/admin/categories/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Category id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The category", body = Category),
        (status = 404, description = "No such category", body = ErrorResponse)
    )
)]
pub async fn get_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<Category>>, AppError> {
    let id = parse_id(&id, "category")?;
    let categories = collection::<Category>(&state.store).await?;
    categories
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("category"))
}

#[utoipa::path(
    put,
    path = "/admin/categories/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Category id")),
    request_body = CategoryInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated", body = Category),
        (status = 400, description = "Name blanked or already taken", body = ErrorResponse),
        (status = 404, description = "No such category", body = ErrorResponse)
    )
)]
pub async fn update_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<Stored<Category>>, AppError> {
    let id = parse_id(&id, "category")?;
    let patch = input.into_patch()?;
    let categories = collection::<Category>(&state.store).await?;

    let updated = categories
        .update_by_id(&id, &patch)
        .await
        .map_err(duplicate_name)?
        .ok_or_else(|| not_found("category"))?;
    tracing::info!(%id, "category updated");

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/categories/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Category id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Deleted, or never existed; books naming it are left alone"),
        (status = 404, description = "Malformed id", body = ErrorResponse)
    )
)]
pub async fn delete_category(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "category")?;
    let categories = collection::<Category>(&state.store).await?;

    let existed = categories.delete_by_id(&id).await?;
    tracing::info!(%id, existed, "category deleted");

    Ok(StatusCode::NO_CONTENT)
}

fn duplicate_name(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate { .. } => already_exists(),
        other => other.into(),
    }
}
