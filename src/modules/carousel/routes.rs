use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use folio_db::{Connection, Filter, Stored};
use folio_http::{AdminSession, ApiJson, AppError, ErrorResponse};

use super::models::{active_only, list_query, CarouselInput, CarouselItem};
use crate::sample;
use crate::state::AppState;
use crate::utils::{collection, not_found, parse_id};

#[utoipa::path(
    get,
    path = "/carousel",
    tag = "carousel",
    responses(
        (status = 200, description = "Active items by order, ties newest first", body = [CarouselItem])
    )
)]
pub async fn list_active(
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<CarouselItem>>>, AppError> {
    match state.store.connect().await? {
        Connection::Live(db) => {
            let items = db
                .collection::<CarouselItem>()
                .find(list_query(active_only()))
                .await?;
            Ok(Json(items))
        }
        Connection::Unavailable => Ok(Json(sample::carousel())),
    }
}

#[utoipa::path(
    get,
    path = "/admin/carousel",
    tag = "admin",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "All items, inactive included", body = [CarouselItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn admin_list(
    _session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<Stored<CarouselItem>>>, AppError> {
    let items = collection::<CarouselItem>(&state.store).await?;
    Ok(Json(items.find(list_query(Filter::All)).await?))
}

#[utoipa::path(
    post,
    path = "/admin/carousel",
    tag = "admin",
    request_body = CarouselInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Created", body = CarouselItem),
        (status = 400, description = "imageUrl missing", body = ErrorResponse)
    )
)]
pub async fn create_item(
    _session: AdminSession,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CarouselInput>,
) -> Result<(StatusCode, Json<Stored<CarouselItem>>), AppError> {
    let item = input.into_item()?;
    let items = collection::<CarouselItem>(&state.store).await?;

    let created = items.create(&item).await?;
    tracing::info!(id = %created.id, order = created.doc.order, "carousel item created");

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/admin/carousel/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Carousel item id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "The item", body = CarouselItem),
        (status = 404, description = "No such item", body = ErrorResponse)
    )
)]
pub async fn get_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<CarouselItem>>, AppError> {
    let id = parse_id(&id, "carousel item")?;
    let items = collection::<CarouselItem>(&state.store).await?;
    items
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("carousel item"))
}

#[utoipa::path(
    put,
    path = "/admin/carousel/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Carousel item id")),
    request_body = CarouselInput,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated", body = CarouselItem),
        (status = 404, description = "No such item", body = ErrorResponse)
    )
)]
pub async fn update_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<CarouselInput>,
) -> Result<Json<Stored<CarouselItem>>, AppError> {
    let id = parse_id(&id, "carousel item")?;
    let patch = input.into_patch()?;
    let items = collection::<CarouselItem>(&state.store).await?;

    let updated = items
        .update_by_id(&id, &patch)
        .await?
        .ok_or_else(|| not_found("carousel item"))?;
    tracing::info!(%id, "carousel item updated");

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/carousel/{id}",
    tag = "admin",
    params(("id" = String, Path, description = "Carousel item id")),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Deleted, or never existed"),
        (status = 404, description = "Malformed id", body = ErrorResponse)
    )
)]
pub async fn delete_item(
    _session: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id, "carousel item")?;
    let items = collection::<CarouselItem>(&state.store).await?;

    let existed = items.delete_by_id(&id).await?;
    tracing::info!(%id, existed, "carousel item deleted");

    Ok(StatusCode::NO_CONTENT)
}
