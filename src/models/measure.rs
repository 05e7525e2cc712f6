use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of utility being measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "measure_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MeasureType {
    Water,
    Gas,
}

impl MeasureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasureType::Water => "water",
            MeasureType::Gas => "gas",
        }
    }
}

impl std::fmt::Display for MeasureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeasureType {
    type Err = String;

    /// Case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "water" => Ok(MeasureType::Water),
            "gas" => Ok(MeasureType::Gas),
            _ => Err(format!("Invalid measure type: {}", s)),
        }
    }
}

/// One recorded reading event for a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Measure {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub measure_type: MeasureType,
    pub measured_at: DateTime<Utc>,
    pub image_base64: String,
    pub has_confirmed: bool,
    pub measure_value: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a measure
#[derive(Debug, Clone)]
pub struct NewMeasure {
    pub customer_id: Uuid,
    pub measure_type: MeasureType,
    pub measured_at: DateTime<Utc>,
    pub image_base64: String,
    pub measure_value: i32,
}

impl NewMeasure {
    /// Materialize the row as it will be stored
    pub fn into_measure(self, id: Uuid, at: DateTime<Utc>) -> Measure {
        Measure {
            id,
            customer_id: self.customer_id,
            measure_type: self.measure_type,
            measured_at: self.measured_at,
            image_base64: self.image_base64,
            has_confirmed: false,
            measure_value: self.measure_value,
            created_at: at,
            updated_at: at,
        }
    }

    /// Uniqueness scope of this measure
    pub fn window(&self) -> Option<MonthWindow> {
        MonthWindow::containing(self.measured_at)
    }
}

/// Half-open calendar-month range `[start, end)` in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// The month containing `at`. `None` only at the edge of chrono's date range.
    pub fn containing(at: DateTime<Utc>) -> Option<Self> {
        let (year, month) = (at.year(), at.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };

        let start = first_instant_of(year, month)?;
        let end = first_instant_of(next_year, next_month)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn first_instant_of(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

/// Filter for listing measures; unset fields do not constrain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureFilter {
    pub customer_id: Uuid,
    pub measure_type: Option<MeasureType>,
    pub window: Option<MonthWindow>,
}

impl MeasureFilter {
    pub fn for_customer(customer_id: Uuid) -> Self {
        Self {
            customer_id,
            measure_type: None,
            window: None,
        }
    }

    pub fn with_type(mut self, measure_type: Option<MeasureType>) -> Self {
        self.measure_type = measure_type;
        self
    }

    pub fn within(mut self, window: MonthWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn matches(&self, measure: &Measure) -> bool {
        measure.customer_id == self.customer_id
            && self
                .measure_type
                .map_or(true, |kind| measure.measure_type == kind)
            && self
                .window
                .map_or(true, |window| window.contains(measure.measured_at))
    }
}
