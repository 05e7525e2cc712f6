use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Path, Query, State},
    Json,
};
use tracing::debug;
use uuid::Uuid;

use super::types::{ListMeasuresQuery, ListMeasuresResponse, MeasureSummary};
use crate::{
    constants::messages,
    error::{ApiError, ErrorResponse, Result},
    utils::is_uuid,
    AppState,
};

/// Get customer measure history
/// GET /{customer_code}/list
#[utoipa::path(
    get,
    path = "/{customer_code}/list",
    tag = "measure",
    params(
        ("customer_code" = String, Path, description = "Customer UUID"),
        ListMeasuresQuery
    ),
    responses(
        (status = 200, description = "Customer measures, newest first", body = ListMeasuresResponse),
        (status = 400, description = "Invalid customer code or measure type", body = ErrorResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_customer_measures(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
    query: std::result::Result<Query<ListMeasuresQuery>, QueryRejection>,
) -> Result<Json<ListMeasuresResponse>> {
    let Path(customer_code) = path?;
    let Query(query) = query?;

    let customer_code = Some(customer_code.as_str())
        .filter(|code| is_uuid(code))
        .and_then(|code| Uuid::parse_str(code).ok())
        .ok_or_else(|| ApiError::InvalidData(messages::INVALID_UUID.to_string()))?;

    let measure_type = query.normalized();
    let (customer, measures) = state
        .measure_service
        .list(customer_code, measure_type.as_deref())
        .await?;

    debug!(customer_id = %customer.id, count = measures.len(), "Listing measures");

    Ok(Json(ListMeasuresResponse {
        customer_code: customer.id,
        measures: measures.into_iter().map(MeasureSummary::from).collect(),
    }))
}
