//! # eventbook
//!
//! Event and booking records for an event-booking site, stored in MongoDB.
//!
//! Every write runs an explicit pipeline before it reaches the database:
//! events get their fields checked, a slug derived from the title and
//! their date and time put into canonical form; bookings get their email
//! normalized and their event reference checked for existence.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── EventService / BookingService (service/)
//!     │
//!     ├── Normalization rules (domain/)
//!     │
//!     ├── RecordStore (persistence/)
//!     │     ├── MongoStore ── ConnectionCache (single-flight)
//!     │     └── MemoryStore
//!     │
//!     └── MongoDB
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::config::{AppConfig, StorageBackend};

/// Builds the HTTP application: API routes, tracing, CORS and the
/// per-request timeout.
pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let router = api::build_router();

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(config.request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Requests still running after `timeout` are answered with
/// `408 Request Timeout`.
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Picks the [`persistence::RecordStore`] selected by `config`.
///
/// # Errors
///
/// Returns [`error::AppError::Configuration`] when the MongoDB backend is
/// selected but `MONGODB_URI` is missing. Connecting itself is deferred
/// to first use.
pub fn build_store(
    config: &AppConfig,
) -> Result<Arc<dyn persistence::RecordStore>, error::AppError> {
    match config.storage {
        StorageBackend::Mongo => {
            config.database.require_uri()?;
            Ok(Arc::new(persistence::MongoStore::new(config.database.clone())))
        }
        StorageBackend::Memory => Ok(Arc::new(persistence::MemoryStore::new())),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn slow_requests_time_out_with_408() {
        let app: Router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(20)));

        let Ok(request) = Request::get("/slow").body(Body::empty()) else {
            panic!("request should build");
        };
        let response = app.oneshot(request).await;
        assert_eq!(
            response.ok().map(|r| r.status()),
            Some(StatusCode::REQUEST_TIMEOUT)
        );
    }
}
