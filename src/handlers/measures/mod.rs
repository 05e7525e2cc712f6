//! Measure endpoints
//!
//! - `POST /upload` records a photographed reading
//! - `PATCH /confirm` confirms a reading against its recorded value
//! - `GET /{customer_code}/list` lists a customer's readings

pub mod confirm;
pub mod list;
pub mod types;
pub mod upload;

pub use confirm::confirm_measure;
pub use list::list_customer_measures;
pub use types::{
    ConfirmRequest, ConfirmResponse, ListMeasuresQuery, ListMeasuresResponse, MeasureSummary,
    UploadRequest, UploadResponse,
};
pub use upload::upload_measure;
