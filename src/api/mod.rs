//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All record endpoints are mounted under `/api/v1`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI description of the record API.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "eventbook", description = "Event and booking record API"),
    paths(
        handlers::event::create_event,
        handlers::event::list_events,
        handlers::event::get_event,
        handlers::event::get_event_by_id,
        handlers::event::update_event,
        handlers::booking::create_booking,
        handlers::booking::list_event_bookings,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Events", description = "Event records"),
        (name = "Bookings", description = "Booking records"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
