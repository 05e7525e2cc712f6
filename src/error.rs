use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::constants::{error_codes, messages};

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "DOUBLE_REPORT")]
    pub error_code: String,
    #[schema(example = "Leitura do mês já realizada")]
    pub error_description: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed schema validation; carries the first violated constraint's message
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Measure type filter not allowed")]
    InvalidType,

    #[error("Measure already reported for this month")]
    DoubleReport,

    #[error("Measure not found")]
    MeasureNotFound,

    #[error("No measures found for customer")]
    MeasuresNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure with the generic description
    pub fn invalid_data() -> Self {
        ApiError::InvalidData(messages::INVALID_DATA.to_string())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidData(_) => error_codes::INVALID_DATA,
            ApiError::InvalidType => error_codes::INVALID_TYPE,
            ApiError::DoubleReport => error_codes::DOUBLE_REPORT,
            ApiError::MeasureNotFound => error_codes::MEASURE_NOT_FOUND,
            ApiError::MeasuresNotFound => error_codes::MEASURES_NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal(_) => error_codes::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidData(_) | ApiError::InvalidType => StatusCode::BAD_REQUEST,
            ApiError::MeasureNotFound | ApiError::MeasuresNotFound => StatusCode::NOT_FOUND,
            ApiError::DoubleReport => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// User-facing description. Server errors never leak their cause.
    pub fn description(&self) -> String {
        match self {
            ApiError::InvalidData(message) if !message.is_empty() => message.clone(),
            ApiError::InvalidData(_) => messages::INVALID_DATA.to_string(),
            ApiError::InvalidType => messages::INVALID_TYPE.to_string(),
            ApiError::DoubleReport => messages::DOUBLE_REPORT.to_string(),
            ApiError::MeasureNotFound => messages::MEASURE_NOT_FOUND.to_string(),
            ApiError::MeasuresNotFound => messages::MEASURES_NOT_FOUND.to_string(),
            ApiError::Database(_) | ApiError::Internal(_) => {
                messages::INTERNAL_SERVER_ERROR.to_string()
            }
        }
    }

    fn log_error(&self) {
        match self.status_code() {
            status if status.is_server_error() => {
                error!(error = %self, "Server error occurred");
            }
            status if status.is_client_error() => {
                warn!(error_code = self.error_code(), error = %self, "Client error occurred");
            }
            _ => {}
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_error();

        let body = ErrorResponse {
            error_code: self.error_code().to_string(),
            error_description: self.description(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::InvalidData(e.body_text()),
            JsonRejection::JsonSyntaxError(e) => ApiError::InvalidData(e.body_text()),
            JsonRejection::MissingJsonContentType(e) => ApiError::InvalidData(e.body_text()),
            _ => ApiError::invalid_data(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidData(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidData(rejection.body_text())
    }
}
