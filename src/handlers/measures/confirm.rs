use axum::{extract::State, Json};
use uuid::Uuid;

use super::types::{ConfirmRequest, ConfirmResponse};
use crate::{
    error::{ApiError, ErrorResponse, Result},
    handlers::extractors::ValidatedJson,
    services::ConfirmOutcome,
    AppState,
};

/// Confirm measure
/// PATCH /confirm
#[utoipa::path(
    patch,
    path = "/confirm",
    tag = "measure",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "`sucess` is false when the value does not match", body = ConfirmResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Measure not found", body = ErrorResponse),
        (status = 409, description = "Measure already confirmed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn confirm_measure(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ConfirmRequest>,
) -> Result<Json<ConfirmResponse>> {
    let measure_id = Uuid::parse_str(&request.measure_uuid)
        .map_err(|e| ApiError::Internal(format!("validated measure_uuid did not parse: {}", e)))?;

    let outcome = state
        .measure_service
        .confirm(measure_id, request.confirmed_value)
        .await?;

    Ok(Json(ConfirmResponse {
        sucess: outcome == ConfirmOutcome::Confirmed,
    }))
}
