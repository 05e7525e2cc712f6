use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::handlers::extractors::FieldOrder;
use crate::models::{Measure, MeasureType};
use crate::utils::validation::{
    deserialize_whole_number, validate_image, validate_measure_datetime, validate_measure_type,
    validate_uuid,
};

/// Upload a photographed reading
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct UploadRequest {
    /// Base64 data URL of the meter photo
    #[validate(custom(function = "validate_image"))]
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub image: String,

    #[validate(custom(function = "validate_uuid"))]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub customer_code: String,

    #[validate(custom(function = "validate_measure_datetime"))]
    #[schema(example = "2024-05-17T10:30:00Z")]
    pub measure_datetime: String,

    /// `water` or `gas`, any case
    #[validate(custom(function = "validate_measure_type"))]
    #[schema(example = "WATER")]
    pub measure_type: String,
}

impl FieldOrder for UploadRequest {
    const FIELDS: &'static [&'static str] =
        &["image", "customer_code", "measure_datetime", "measure_type"];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct UploadResponse {
    /// Echo of the stored image payload
    pub image_url: String,
    pub measure_value: i32,
    pub measure_uuid: Uuid,
}

impl From<Measure> for UploadResponse {
    fn from(measure: Measure) -> Self {
        Self {
            image_url: measure.image_base64,
            measure_value: measure.measure_value,
            measure_uuid: measure.id,
        }
    }
}

/// Confirm a reading's value
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ConfirmRequest {
    #[validate(custom(function = "validate_uuid"))]
    #[schema(example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub measure_uuid: String,

    /// Any JSON number without a fractional part
    #[serde(deserialize_with = "deserialize_whole_number")]
    #[validate(range(min = 0, message = "Valor confirmado deve ser um número inteiro positivo."))]
    #[schema(example = 3)]
    pub confirmed_value: i64,
}

impl FieldOrder for ConfirmRequest {
    const FIELDS: &'static [&'static str] = &["measure_uuid", "confirmed_value"];
}

/// Field name `sucess` is part of the published contract
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ConfirmResponse {
    pub sucess: bool,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMeasuresQuery {
    /// `water`, `gas` or empty for all
    pub measure_type: Option<String>,
}

impl ListMeasuresQuery {
    /// Lower-cased filter as received
    pub fn normalized(&self) -> Option<String> {
        self.measure_type.as_ref().map(|value| value.to_lowercase())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct MeasureSummary {
    pub measure_uuid: Uuid,
    pub measure_datetime: DateTime<Utc>,
    pub measure_type: MeasureType,
    pub has_confirmed: bool,
    /// Currently the stored image payload
    pub image_url: String,
}

impl From<Measure> for MeasureSummary {
    fn from(measure: Measure) -> Self {
        Self {
            measure_uuid: measure.id,
            measure_datetime: measure.measured_at,
            measure_type: measure.measure_type,
            has_confirmed: measure.has_confirmed,
            image_url: measure.image_base64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ListMeasuresResponse {
    pub customer_code: Uuid,
    pub measures: Vec<MeasureSummary>,
}
