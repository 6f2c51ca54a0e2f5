pub mod a001_lead;
pub mod a002_contact;
pub mod a003_notification;
pub mod a004_ai_assistant;
