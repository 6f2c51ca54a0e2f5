pub mod d400_lead_analytics;
pub mod d401_pipeline_overview;
