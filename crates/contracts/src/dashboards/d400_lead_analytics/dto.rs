use crate::enums::LeadStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trailing windows offered by the analytics page
pub const SUPPORTED_WINDOWS: [u32; 4] = [1, 3, 6, 12];

/// Request for the lead analytics dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeadAnalyticsRequest {
    /// Trailing window for the monthly trend; configured default when absent
    pub window_months: Option<u32>,
}

/// Response for the lead analytics dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadAnalyticsResponse {
    pub generated_at: DateTime<Utc>,
    pub window_months: u32,
    pub kpis: LeadKpis,
    /// Always six rows, canonical order
    pub stages: Vec<StageSummary>,
    pub sources: Vec<BreakdownRow>,
    pub industries: Vec<BreakdownRow>,
    /// Dense: one point per month of the window, oldest first
    pub monthly_trend: Vec<MonthlyTrendPoint>,
    pub funnel: Vec<FunnelStage>,
    pub assignees: Vec<AssigneePerformance>,
    pub deal_sizes: Vec<DealSizeBucket>,
}

/// Headline numbers
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LeadKpis {
    pub total_leads: usize,
    pub total_value: f64,
    pub won_leads: usize,
    pub lost_leads: usize,
    pub won_value: f64,
    /// Percent, 0..=100
    pub conversion_rate: f64,
    pub avg_deal_size: f64,
    /// Leads not closed (won or lost)
    pub active_pipeline: usize,
    pub pipeline_value: f64,
    /// Mean days from creation to last update for won leads
    pub avg_sales_cycle_days: f64,
}

/// Kanban column / stage bar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageSummary {
    pub stage: LeadStage,
    pub count: usize,
    pub value: f64,
}

/// Source or industry bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakdownRow {
    pub name: String,
    pub leads: usize,
    pub won: usize,
    pub value: f64,
    /// Percent of the bucket's leads that were won
    pub conversion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTrendPoint {
    pub year: i32,
    pub month: u32,
    /// e.g. "Jul 25"
    pub label: String,
    pub leads: usize,
    pub won: usize,
    /// Value of the month's won leads
    pub value: f64,
    pub conversion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunnelStage {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssigneePerformance {
    pub name: String,
    pub leads: usize,
    pub won: usize,
    /// Won value
    pub value: f64,
    pub conversion: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DealSizeBucket {
    pub range: String,
    pub min: f64,
    /// Exclusive upper bound, `None` for the open-ended top bucket
    pub max: Option<f64>,
    pub count: usize,
}
