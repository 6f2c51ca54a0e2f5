pub mod error;
pub mod pipeline_store;
pub mod service;
pub mod stage_transition;

pub use error::PipelineError;
pub use pipeline_store::{LoadOutcome, PipelineSnapshot, PipelineStore};
pub use stage_transition::{move_lead, TransitionOutcome, TransitionPolicy};
