//! Event handlers: create, list, get, update.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateEventRequest, EventListResponse, EventResponse, PaginationParams, UpdateEventRequest,
};
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};

/// `POST /events` — Create an event.
///
/// # Errors
///
/// Returns [`AppError`] if a field is missing or malformed, or the slug
/// derived from the title is already taken.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Validates the submitted fields, derives the slug from the title, normalizes date and time, and stores the event.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Invalid or missing fields", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.create_event(req.into()).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// `GET /events` — List events with pagination.
///
/// # Errors
///
/// Returns [`AppError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns a page of events ordered by date and time.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated event list", body = EventListResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = state
        .event_service
        .list_events(params.offset(), params.limit())
        .await?;
    Ok(Json(EventListResponse {
        data: page.events.into_iter().map(EventResponse::from).collect(),
        pagination: params.meta(page.total),
    }))
}

/// `GET /events/{slug}` — Get an event by slug.
///
/// # Errors
///
/// Returns [`AppError::EventNotFound`] if no event has the slug.
#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}",
    tag = "Events",
    summary = "Get event by slug",
    params(
        ("slug" = String, Path, description = "Event slug"),
    ),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.get_event_by_slug(&slug).await?;
    Ok(Json(EventResponse::from(event)))
}

/// `GET /events/id/{id}` — Get an event by record id.
///
/// # Errors
///
/// Returns [`AppError`] for a malformed id or a missing event.
#[utoipa::path(
    get,
    path = "/api/v1/events/id/{id}",
    tag = "Events",
    summary = "Get event by id",
    params(
        ("id" = String, Path, description = "24-character hex record id"),
    ),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.get_event_by_id(&id).await?;
    Ok(Json(EventResponse::from(event)))
}

/// `PATCH /events/{slug}` — Update some fields of an event.
///
/// # Errors
///
/// Returns [`AppError`] if the event is missing, the merged record is
/// invalid, or a changed title collides with another event's slug.
#[utoipa::path(
    patch,
    path = "/api/v1/events/{slug}",
    tag = "Events",
    summary = "Update an event",
    description = "Applies the provided fields. The slug is re-derived only if the title changes; date and time are re-normalized only if they change.",
    params(
        ("slug" = String, Path, description = "Current event slug"),
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "New slug already taken", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_service.update_event(&slug, req.into()).await?;
    Ok(Json(EventResponse::from(event)))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{slug}", get(get_event).patch(update_event))
        .route("/events/id/{id}", get(get_event_by_id))
}
