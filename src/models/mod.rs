pub mod customer;
pub mod measure;

pub use customer::Customer;
pub use measure::{Measure, MeasureFilter, MeasureType, MonthWindow, NewMeasure};
