use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::repository::{CreateOutcome, MeasureStore};
use crate::error::Result;
use crate::models::{Customer, Measure, MeasureFilter, NewMeasure};

const MEASURE_COLUMNS: &str = "id, customer_id, measure_type, measured_at, image_base64, \
     has_confirmed, measure_value, created_at, updated_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgMeasureStore {
    db_pool: PgPool,
}

impl PgMeasureStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

/// SELECT for `filter`, ordered newest first
fn build_list_query(filter: &MeasureFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {} FROM measures WHERE customer_id = ", MEASURE_COLUMNS));
    query.push_bind(filter.customer_id);

    if let Some(measure_type) = filter.measure_type {
        query.push(" AND measure_type = ").push_bind(measure_type);
    }

    if let Some(window) = filter.window {
        query
            .push(" AND measured_at >= ")
            .push_bind(window.start)
            .push(" AND measured_at < ")
            .push_bind(window.end);
    }

    query.push(" ORDER BY measured_at DESC");
    query
}

#[async_trait]
impl MeasureStore for PgMeasureStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.db_pool).await?;
        Ok(())
    }

    async fn find_customer(&self, id: Uuid) -> Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, created_at, updated_at FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(customer)
    }

    async fn find_measure(&self, id: Uuid) -> Result<Option<Measure>> {
        let measure = sqlx::query_as::<_, Measure>(&format!(
            "SELECT {} FROM measures WHERE id = $1",
            MEASURE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;

        Ok(measure)
    }

    async fn list_measures(&self, filter: &MeasureFilter) -> Result<Vec<Measure>> {
        let measures = build_list_query(filter)
            .build_query_as::<Measure>()
            .fetch_all(&self.db_pool)
            .await?;

        debug!(
            customer_id = %filter.customer_id,
            count = measures.len(),
            "Listed measures"
        );

        Ok(measures)
    }

    async fn create_measure(&self, new: NewMeasure) -> Result<CreateOutcome> {
        let window = new
            .window()
            .ok_or_else(crate::error::ApiError::invalid_data)?;

        let mut tx = self.db_pool.begin().await?;

        // Serializes uploads per (customer, type) until commit
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("{}:{}", new.customer_id, new.measure_type))
            .execute(&mut *tx)
            .await?;

        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM measures \
             WHERE customer_id = $1 AND measure_type = $2 \
             AND measured_at >= $3 AND measured_at < $4 \
             LIMIT 1",
        )
        .bind(new.customer_id)
        .bind(new.measure_type)
        .bind(window.start)
        .bind(window.end)
        .fetch_optional(&mut *tx)
        .await?;

        if existing.is_some() {
            tx.rollback().await?;
            return Ok(CreateOutcome::Duplicate);
        }

        let now = Utc::now();
        let customer_created = sqlx::query(
            "INSERT INTO customers (id, created_at, updated_at) VALUES ($1, $2, $2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(new.customer_id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        let measure = sqlx::query_as::<_, Measure>(&format!(
            "INSERT INTO measures (id, customer_id, measure_type, measured_at, image_base64, \
             has_confirmed, measure_value, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7, $7) \
             RETURNING {}",
            MEASURE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(new.customer_id)
        .bind(new.measure_type)
        .bind(new.measured_at)
        .bind(&new.image_base64)
        .bind(new.measure_value)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CreateOutcome::Created {
            measure,
            customer_created,
        })
    }

    async fn confirm_measure(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        let mut tx = self.db_pool.begin().await?;

        let customer_id: Option<Uuid> = sqlx::query_scalar(
            "UPDATE measures SET has_confirmed = TRUE, updated_at = $2 \
             WHERE id = $1 AND has_confirmed = FALSE \
             RETURNING customer_id",
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(customer_id) = customer_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE customers SET updated_at = $2 WHERE id = $1")
            .bind(customer_id)
            .bind(at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
