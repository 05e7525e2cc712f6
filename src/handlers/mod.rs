pub mod extractors;
pub mod health;
pub mod measures;

// Re-export commonly used types
pub use extractors::{FieldOrder, ValidatedJson};
