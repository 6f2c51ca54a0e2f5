//! Common types and traits for all entity records

pub mod entity_record;
pub mod lenient;

// Re-exports
pub use entity_record::{EntityRecord, RecordId};
