use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repository::{CreateOutcome, MeasureStore};
use crate::error::{ApiError, Result};
use crate::models::{Customer, Measure, MeasureFilter, NewMeasure};

#[derive(Default)]
struct Tables {
    customers: HashMap<Uuid, Customer>,
    measures: HashMap<Uuid, Measure>,
}

/// Process-local store. Every mutation holds the write lock for its whole
/// check-then-write sequence.
#[derive(Default)]
pub struct InMemoryMeasureStore {
    tables: RwLock<Tables>,
}

impl InMemoryMeasureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn customer_count(&self) -> usize {
        self.tables.read().await.customers.len()
    }

    pub async fn measure_count(&self) -> usize {
        self.tables.read().await.measures.len()
    }
}

#[async_trait]
impl MeasureStore for InMemoryMeasureStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>> {
        let tables = self.tables.read().await;
        Ok(tables.customers.get(&id).cloned())
    }

    async fn find_measure(&self, id: Uuid) -> Result<Option<Measure>> {
        let tables = self.tables.read().await;
        Ok(tables.measures.get(&id).cloned())
    }

    async fn list_measures(&self, filter: &MeasureFilter) -> Result<Vec<Measure>> {
        let tables = self.tables.read().await;
        let mut measures: Vec<Measure> = tables
            .measures
            .values()
            .filter(|measure| filter.matches(measure))
            .cloned()
            .collect();

        measures.sort_by(|a, b| b.measured_at.cmp(&a.measured_at));
        Ok(measures)
    }

    async fn create_measure(&self, new: NewMeasure) -> Result<CreateOutcome> {
        let window = new.window().ok_or_else(ApiError::invalid_data)?;
        let filter = MeasureFilter::for_customer(new.customer_id)
            .with_type(Some(new.measure_type))
            .within(window);

        let mut tables = self.tables.write().await;

        if tables.measures.values().any(|measure| filter.matches(measure)) {
            return Ok(CreateOutcome::Duplicate);
        }

        let now = Utc::now();
        let customer_created = !tables.customers.contains_key(&new.customer_id);
        if customer_created {
            tables
                .customers
                .insert(new.customer_id, Customer::new(new.customer_id, now));
        }

        let measure = new.into_measure(Uuid::new_v4(), now);
        tables.measures.insert(measure.id, measure.clone());

        Ok(CreateOutcome::Created {
            measure,
            customer_created,
        })
    }

    async fn confirm_measure(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let mut tables = self.tables.write().await;

        let customer_id = match tables.measures.get_mut(&id) {
            Some(measure) if !measure.has_confirmed => {
                measure.has_confirmed = true;
                measure.updated_at = at;
                measure.customer_id
            }
            _ => return Ok(false),
        };

        if let Some(customer) = tables.customers.get_mut(&customer_id) {
            customer.updated_at = at;
        }

        Ok(true)
    }
}
