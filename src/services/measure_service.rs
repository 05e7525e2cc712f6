use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::constants::measure::PLACEHOLDER_VALUE;
use crate::database::{CreateOutcome, MeasureStore};
use crate::error::{ApiError, Result};
use crate::models::{Customer, Measure, MeasureFilter, MeasureType, NewMeasure};
use crate::utils::validation::parse_measure_datetime;

/// Input for [`MeasureService::upload`], already schema-validated
#[derive(Debug, Clone)]
pub struct UploadMeasure {
    pub image: String,
    pub customer_code: Uuid,
    pub measure_datetime: String,
    pub measure_type: String,
}

/// Outcome of a confirmation attempt that did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed,
    ValueMismatch,
}

/// Business rules for uploading, confirming and listing measures
#[derive(Clone)]
pub struct MeasureService {
    store: Arc<dyn MeasureStore>,
}

impl MeasureService {
    pub fn new(store: Arc<dyn MeasureStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MeasureStore> {
        &self.store
    }

    /// Record a new unconfirmed measure with the placeholder value.
    ///
    /// Fails with `DoubleReport` if the customer already has a measure of
    /// this type in the same calendar month.
    pub async fn upload(&self, request: UploadMeasure) -> Result<Measure> {
        let measured_at =
            parse_measure_datetime(&request.measure_datetime).ok_or_else(ApiError::invalid_data)?;
        let measure_type: MeasureType = request
            .measure_type
            .parse()
            .map_err(|_| ApiError::invalid_data())?;

        let new = NewMeasure {
            customer_id: request.customer_code,
            measure_type,
            measured_at,
            image_base64: request.image,
            measure_value: PLACEHOLDER_VALUE,
        };

        match self.store.create_measure(new).await? {
            CreateOutcome::Created {
                measure,
                customer_created,
            } => {
                if customer_created {
                    info!(customer_id = %measure.customer_id, "Customer created on first upload");
                }
                info!(
                    measure_id = %measure.id,
                    customer_id = %measure.customer_id,
                    measure_type = %measure.measure_type,
                    measured_at = %measure.measured_at,
                    "Measure uploaded"
                );
                Ok(measure)
            }
            CreateOutcome::Duplicate => {
                debug!(
                    customer_id = %request.customer_code,
                    measure_type = %measure_type,
                    "Measure already reported for this month"
                );
                Err(ApiError::DoubleReport)
            }
        }
    }

    /// Confirm `measure_id` if `confirmed_value` matches its recorded value.
    ///
    /// A mismatch is not an error: nothing changes and `ValueMismatch` is returned.
    pub async fn confirm(&self, measure_id: Uuid, confirmed_value: i64) -> Result<ConfirmOutcome> {
        let measure = self
            .store
            .find_measure(measure_id)
            .await?
            .ok_or(ApiError::MeasureNotFound)?;

        if measure.has_confirmed {
            return Err(ApiError::DoubleReport);
        }

        if i64::from(measure.measure_value) != confirmed_value {
            debug!(measure_id = %measure_id, "Confirmed value does not match recorded value");
            return Ok(ConfirmOutcome::ValueMismatch);
        }

        // A concurrent confirmation may have won between the read and this write
        if !self.store.confirm_measure(measure_id, Utc::now()).await? {
            return Err(ApiError::DoubleReport);
        }

        info!(measure_id = %measure_id, customer_id = %measure.customer_id, "Measure confirmed");
        Ok(ConfirmOutcome::Confirmed)
    }

    /// List a customer's measures, newest first.
    ///
    /// `measure_type` is the lower-cased query value: `None` or `""` means no
    /// filter; anything other than `water`/`gas` is `InvalidType`.
    pub async fn list(
        &self,
        customer_code: Uuid,
        measure_type: Option<&str>,
    ) -> Result<(Customer, Vec<Measure>)> {
        let kind = match measure_type {
            None | Some("") => None,
            Some(value) => Some(value.parse::<MeasureType>().map_err(|_| ApiError::InvalidType)?),
        };

        let customer = self
            .store
            .find_customer(customer_code)
            .await?
            .ok_or(ApiError::MeasuresNotFound)?;

        let filter = MeasureFilter::for_customer(customer.id).with_type(kind);
        let measures = self.store.list_measures(&filter).await?;

        Ok((customer, measures))
    }
}
