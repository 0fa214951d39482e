use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use folio_db::{Filter, Stored};
use folio_http::{AdminSession, ApiJson, AppError, ErrorResponse};

use super::models::{ContactAccepted, ContactInput, Feedback, FeedbackQuery, ReadFlag};
use crate::state::AppState;
use crate::utils::{collection, not_found, parse_id};

#[utoipa::path(
    post,
    path = "/contact",
    tag = "feedback",
    request_body = ContactInput,
    responses(
        (status = 201, description = "Stored", body = ContactAccepted),
        (status = 400, description = "Name or phone missing", body = ErrorResponse)
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<ContactAccepted>), AppError> {
    let feedback = input.into_feedback()?;
    let feedbacks = collection::<Feedback>(&state.store).await?;

    let created = feedbacks.create(&feedback).await?;
    tracing::info!(id = %created.id, "contact feedback received");

    Ok((
        StatusCode::CREATED,
        Json(ContactAccepted {
            ok: true,
            id: created.id,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/feedbacks",
    tag = "admin",
    params(FeedbackQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Feedback, newest first", body = [Feedback]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_feedbacks(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<FeedbackQuery>,
) -> Result<Json<Vec<Stored<Feedback>>>, AppError> {
    let feedbacks = collection::<Feedback>(&state.store).await?;
    Ok(Json(feedbacks.find(params.list_query()).await?))
}

#[utoipa::path(
    put,
    path = "/admin/feedbacks",
    tag = "admin",
    params(FeedbackQuery),
    request_body = ReadFlag,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated", body = Feedback),
        (status = 400, description = "No id given", body = ErrorResponse),
        (status = 404, description = "No such feedback", body = ErrorResponse)
    )
)]
pub async fn mark_read(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<FeedbackQuery>,
    body: Option<ApiJson<ReadFlag>>,
) -> Result<Json<Stored<Feedback>>, AppError> {
    let flag = body.map(|ApiJson(flag)| flag).unwrap_or_default();
    let raw = params
        .target()
        .ok_or_else(|| AppError::invalid_field("id", "id required"))?;
    let id = parse_id(raw, "feedback")?;
    let feedbacks = collection::<Feedback>(&state.store).await?;

    let updated = feedbacks
        .update_by_id(&id, &flag)
        .await?
        .ok_or_else(|| not_found("feedback"))?;
    tracing::info!(%id, read = flag.read, "feedback read flag set");

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/admin/feedbacks",
    tag = "admin",
    params(FeedbackQuery),
    security(("bearerAuth" = [])),
    responses(
        (status = 204, description = "Deleted the given feedback, or all of it when no id is given"),
        (status = 404, description = "Malformed id", body = ErrorResponse)
    )
)]
pub async fn delete_feedbacks(
    _session: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<FeedbackQuery>,
) -> Result<StatusCode, AppError> {
    let feedbacks = collection::<Feedback>(&state.store).await?;

    match params.target() {
        Some(raw) => {
            let id = parse_id(raw, "feedback")?;
            let existed = feedbacks.delete_by_id(&id).await?;
            tracing::info!(%id, existed, "feedback deleted");
        }
        None => {
            let removed = feedbacks.delete_many(Filter::All).await?;
            tracing::warn!(removed, "all feedback deleted");
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
