use chrono::{DateTime, Utc};
use contracts::dashboards::d400_lead_analytics::{
    LeadAnalyticsRequest, LeadAnalyticsResponse, LeadKpis,
};
use contracts::domain::a001_lead::aggregate::Lead;

use super::aggregation as agg;
use super::is_supported_window;
use crate::domain::a001_lead::{PipelineError, PipelineSnapshot, PipelineStore};

/// Analytics page over the current snapshot
pub async fn get_lead_analytics(
    store: &PipelineStore,
    request: LeadAnalyticsRequest,
    default_window: u32,
) -> Result<LeadAnalyticsResponse, PipelineError> {
    let window_months = request.window_months.unwrap_or(default_window);
    if !is_supported_window(window_months) {
        return Err(PipelineError::Validation(format!(
            "Unsupported window: {} months",
            window_months
        )));
    }

    let snapshot = store.snapshot().await;
    Ok(build(&snapshot, window_months, Utc::now()))
}

pub fn build(
    snapshot: &PipelineSnapshot,
    window_months: u32,
    now: DateTime<Utc>,
) -> LeadAnalyticsResponse {
    let leads = &snapshot.leads;
    let contacts = &snapshot.contacts;

    LeadAnalyticsResponse {
        generated_at: now,
        window_months,
        kpis: kpis(leads),
        stages: agg::count_by_stage(leads),
        sources: agg::by_source(leads, contacts),
        industries: agg::by_industry(leads, contacts),
        monthly_trend: agg::monthly_trend(leads, window_months, now),
        funnel: agg::funnel(leads),
        assignees: agg::performance_by_assignee(leads),
        deal_sizes: agg::deal_size_distribution(leads),
    }
}

fn kpis(leads: &[Lead]) -> LeadKpis {
    LeadKpis {
        total_leads: leads.len(),
        total_value: agg::total_value(leads),
        won_leads: agg::won_count(leads),
        lost_leads: agg::lost_count(leads),
        won_value: agg::won_value(leads),
        conversion_rate: agg::conversion_rate(leads),
        avg_deal_size: agg::avg_deal_size(leads),
        active_pipeline: agg::active_count(leads),
        pipeline_value: agg::pipeline_value(leads),
        avg_sales_cycle_days: agg::avg_sales_cycle_days(leads),
    }
}
