use chrono::{DateTime, Utc};
use contracts::dashboards::d401_pipeline_overview::PipelineOverviewResponse;

use crate::dashboards::d400_lead_analytics::aggregation as agg;
use crate::domain::a001_lead::{PipelineSnapshot, PipelineStore};
use crate::shared::format::round1;

/// Home dashboard over the current snapshot
pub async fn get_pipeline_overview(store: &PipelineStore) -> PipelineOverviewResponse {
    let snapshot = store.snapshot().await;
    build(&snapshot, Utc::now())
}

pub fn build(snapshot: &PipelineSnapshot, now: DateTime<Utc>) -> PipelineOverviewResponse {
    let leads = &snapshot.leads;

    PipelineOverviewResponse {
        generated_at: now,
        total_revenue: agg::won_value(leads),
        conversion_rate: agg::conversion_rate(leads),
        deal_velocity_days: round1(agg::avg_sales_cycle_days(leads)),
        pipeline_value: agg::pipeline_value(leads),
        active_leads: agg::active_count(leads),
        total_contacts: snapshot.contacts.len(),
        industry_revenue: agg::industry_revenue(leads, &snapshot.contacts),
        funnel: agg::stage_funnel(leads),
        revenue_by_month: agg::revenue_by_month(leads),
    }
}
