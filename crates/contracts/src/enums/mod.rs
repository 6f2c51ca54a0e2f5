pub mod department;
pub mod lead_priority;
pub mod lead_stage;

pub use lead_priority::{LeadPriority, LeadPriorityValue};
pub use lead_stage::{LeadStage, LeadStageValue};
