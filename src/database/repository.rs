//! Data-access seam for customers and measures.
//!
//! Handlers and services only see [`MeasureStore`]; the PostgreSQL and
//! in-memory implementations are interchangeable behind an `Arc<dyn _>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Customer, Measure, MeasureFilter, NewMeasure};

/// Result of [`MeasureStore::create_measure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created {
        measure: Measure,
        customer_created: bool,
    },
    /// A measure of the same type already exists for the customer in that month
    Duplicate,
}

/// Storage operations over the customer and measure entities
#[async_trait]
pub trait MeasureStore: Send + Sync {
    /// Cheap round trip used by the health check
    async fn ping(&self) -> Result<()>;

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>>;

    async fn find_measure(&self, id: Uuid) -> Result<Option<Measure>>;

    /// Measures matching `filter`, newest `measured_at` first
    async fn list_measures(&self, filter: &MeasureFilter) -> Result<Vec<Measure>>;

    /// Insert a measure unless one of the same type already exists in its month.
    ///
    /// The duplicate check, customer create-if-absent and insert happen as one
    /// atomic unit, so concurrent uploads cannot both succeed.
    async fn create_measure(&self, new: NewMeasure) -> Result<CreateOutcome>;

    /// Mark an unconfirmed measure as confirmed and touch its customer.
    ///
    /// Returns `false` when the measure is missing or was already confirmed.
    async fn confirm_measure(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool>;
}
