use crate::dashboards::d400_lead_analytics::FunnelStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Home dashboard summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOverviewResponse {
    pub generated_at: DateTime<Utc>,
    /// Sum of won deal values
    pub total_revenue: f64,
    pub conversion_rate: f64,
    /// Average sales cycle of won deals, in days
    pub deal_velocity_days: f64,
    pub pipeline_value: f64,
    pub active_leads: usize,
    pub total_contacts: usize,
    /// Won value per contact industry, largest first
    pub industry_revenue: Vec<NamedValue>,
    /// Open stages plus Closed Won
    pub funnel: Vec<FunnelStage>,
    /// Won value per month of closing, oldest first
    pub revenue_by_month: Vec<MonthlyRevenue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    /// e.g. "Jul 2025"
    pub label: String,
    pub revenue: f64,
}
