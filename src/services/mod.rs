// Services module - business rules over the measure store

pub mod measure_service;

pub use measure_service::{ConfirmOutcome, MeasureService, UploadMeasure};
