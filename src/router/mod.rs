//! Router configuration
//!
//! Measure endpoints sit at the root to keep the published paths stable;
//! health and API docs sit beside them.

use std::time::Duration;

use axum::{
    http::StatusCode,
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::error::ErrorResponse;
use crate::handlers::{health, measures};
use crate::middleware::request_logger_middleware;
use crate::models::MeasureType;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(title = "Meter Reading API", version = "0.1.0"),
    paths(
        measures::upload::upload_measure,
        measures::confirm::confirm_measure,
        measures::list::list_customer_measures,
        health::health_check,
    ),
    components(schemas(
        measures::UploadRequest,
        measures::UploadResponse,
        measures::ConfirmRequest,
        measures::ConfirmResponse,
        measures::ListMeasuresResponse,
        measures::MeasureSummary,
        MeasureType,
        ErrorResponse,
        health::HealthStatus,
        health::ServiceHealth,
    )),
    tags(
        (name = "measure", description = "Meter reading upload, confirmation and history"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Measure routes
pub fn measure_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(measures::upload_measure))
        .route("/confirm", patch(measures::confirm_measure))
        .route("/{customer_code}/list", get(measures::list_customer_measures))
}

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let request_timeout = Duration::from_secs(app_state.config.request_timeout);

    Router::new()
        .route("/health", get(health::health_check))
        .merge(measure_routes())
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_logger_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
