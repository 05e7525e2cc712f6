use axum::{extract::State, http::StatusCode, Json};
use tracing::info;
use uuid::Uuid;

use super::types::{UploadRequest, UploadResponse};
use crate::{
    error::{ApiError, ErrorResponse, Result},
    handlers::extractors::ValidatedJson,
    services::UploadMeasure,
    AppState,
};

/// Upload a measure
/// POST /upload
#[utoipa::path(
    post,
    path = "/upload",
    tag = "measure",
    request_body = UploadRequest,
    responses(
        (status = 201, description = "Measure recorded", body = UploadResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Measure already reported this month", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_measure(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let customer_code = Uuid::parse_str(&request.customer_code)
        .map_err(|e| ApiError::Internal(format!("validated customer_code did not parse: {}", e)))?;

    info!(
        customer_id = %customer_code,
        measure_type = %request.measure_type,
        "Uploading measure"
    );

    let measure = state
        .measure_service
        .upload(UploadMeasure {
            image: request.image,
            customer_code,
            measure_datetime: request.measure_datetime,
            measure_type: request.measure_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(measure))))
}
