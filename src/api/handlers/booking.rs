//! Booking handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{BookingResponse, CreateBookingRequest};
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};

/// `POST /bookings` — Book an event.
///
/// # Errors
///
/// Returns [`AppError`] for a malformed email or event id, or when the
/// referenced event does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "Create a booking",
    description = "Normalizes the email and stores the booking if the referenced event exists at the time of the request.",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid email or event id", body = ErrorResponse),
        (status = 422, description = "Referenced event does not exist", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.create_booking(req.into()).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// `GET /events/{slug}/bookings` — List bookings of an event.
///
/// # Errors
///
/// Returns [`AppError::EventNotFound`] if no event has the slug.
#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}/bookings",
    tag = "Bookings",
    summary = "List bookings of an event",
    params(
        ("slug" = String, Path, description = "Event slug"),
    ),
    responses(
        (status = 200, description = "Bookings, oldest first", body = Vec<BookingResponse>),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn list_event_bookings(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_service.list_bookings_for_event(&slug).await?;
    let body: Vec<BookingResponse> = bookings.into_iter().map(BookingResponse::from).collect();
    Ok(Json(body))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking))
        .route("/events/{slug}/bookings", get(list_event_bookings))
}
