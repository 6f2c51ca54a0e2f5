//! Pure pipeline aggregations. No I/O; `now` is always passed in.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use contracts::dashboards::d400_lead_analytics::{
    AssigneePerformance, BreakdownRow, DealSizeBucket, FunnelStage, MonthlyTrendPoint,
    StageSummary,
};
use contracts::dashboards::d401_pipeline_overview::{MonthlyRevenue, NamedValue};
use contracts::domain::a001_lead::aggregate::Lead;
use contracts::domain::a002_contact::aggregate::Contact;
use contracts::enums::LeadStage;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::shared::format::format_lakh;

pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNASSIGNED: &str = "Unassigned";

const LAKH: f64 = 100_000.0;
/// Lower bounds of the deal-size buckets, in lakh
const DEAL_SIZE_EDGES: [f64; 5] = [0.0, 1.0, 5.0, 10.0, 50.0];

/// Six canonical buckets in board order. Leads with an unknown stage count
/// in none of them.
pub fn count_by_stage(leads: &[Lead]) -> Vec<StageSummary> {
    LeadStage::ALL
        .into_iter()
        .map(|stage| {
            let in_stage = leads.iter().filter(|l| l.stage.is(stage));
            let (count, value) = in_stage.fold((0, 0.0), |(c, v), l| (c + 1, v + l.value));
            StageSummary { stage, count, value }
        })
        .collect()
}

/// Won / all × 100; 0 for no leads
pub fn conversion_rate(leads: &[Lead]) -> f64 {
    percent(won_count(leads), leads.len())
}

/// Won value / won count; 0 without wins
pub fn avg_deal_size(leads: &[Lead]) -> f64 {
    let won = won_count(leads);
    if won == 0 {
        0.0
    } else {
        won_value(leads) / won as f64
    }
}

pub fn total_value(leads: &[Lead]) -> f64 {
    leads.iter().map(|l| l.value).sum()
}

pub fn won_value(leads: &[Lead]) -> f64 {
    leads.iter().filter(|l| l.is_won()).map(|l| l.value).sum()
}

/// Value of leads not yet closed
pub fn pipeline_value(leads: &[Lead]) -> f64 {
    leads.iter().filter(|l| l.is_active()).map(|l| l.value).sum()
}

pub fn active_count(leads: &[Lead]) -> usize {
    leads.iter().filter(|l| l.is_active()).count()
}

pub fn won_count(leads: &[Lead]) -> usize {
    leads.iter().filter(|l| l.is_won()).count()
}

pub fn lost_count(leads: &[Lead]) -> usize {
    leads.iter().filter(|l| l.is_lost()).count()
}

/// Acquisition channel: the lead's own `source`, else the contact's
/// `lead_source`, else [`UNKNOWN_SOURCE`]
pub fn by_source(leads: &[Lead], contacts: &[Contact]) -> Vec<BreakdownRow> {
    let index = contact_index(contacts);
    breakdown(leads, |lead| {
        lead.source
            .clone()
            .or_else(|| contact_of(lead, &index).and_then(|c| c.lead_source.clone()))
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    })
}

/// Grouped by the linked contact's industry; no or dangling contact goes to
/// [`UNCATEGORIZED`]
pub fn by_industry(leads: &[Lead], contacts: &[Contact]) -> Vec<BreakdownRow> {
    let index = contact_index(contacts);
    breakdown(leads, |lead| industry_of(lead, &index))
}

/// Dense trailing window ending with the month of `now`, oldest first.
/// Leads fall into the month of their `created_date`.
pub fn monthly_trend(leads: &[Lead], window_months: u32, now: DateTime<Utc>) -> Vec<MonthlyTrendPoint> {
    let months = trailing_months(now, window_months);
    let mut buckets: BTreeMap<(i32, u32), (usize, usize, f64)> =
        months.iter().map(|&ym| (ym, (0, 0, 0.0))).collect();

    for lead in leads {
        let Some(created) = lead.created_date else {
            continue;
        };
        if let Some((count, won, value)) = buckets.get_mut(&(created.year(), created.month())) {
            *count += 1;
            if lead.is_won() {
                *won += 1;
                *value += lead.value;
            }
        }
    }

    buckets
        .into_iter()
        .map(|((year, month), (count, won, value))| MonthlyTrendPoint {
            year,
            month,
            label: month_label(year, month, "%b %y"),
            leads: count,
            won,
            value,
            conversion: percent(won, count),
        })
        .collect()
}

/// "Total Leads", the four open stages, then "Closed Won"
pub fn funnel(leads: &[Lead]) -> Vec<FunnelStage> {
    let mut stages = vec![FunnelStage {
        name: "Total Leads".into(),
        value: leads.len(),
    }];
    stages.extend(stage_funnel(leads));
    stages
}

/// Open stages and Closed Won, without the total bar
pub fn stage_funnel(leads: &[Lead]) -> Vec<FunnelStage> {
    LeadStage::ACTIVE
        .into_iter()
        .chain(std::iter::once(LeadStage::ClosedWon))
        .map(|stage| FunnelStage {
            name: stage.as_str().to_string(),
            value: leads.iter().filter(|l| l.stage.is(stage)).count(),
        })
        .collect()
}

/// Per assignee, keyed by the local part of an e-mail address. `value` is
/// the won value. Sorted by value, largest first.
pub fn performance_by_assignee(leads: &[Lead]) -> Vec<AssigneePerformance> {
    let mut groups: BTreeMap<String, (usize, usize, f64)> = BTreeMap::new();
    for lead in leads {
        let name = lead
            .assigned_to
            .as_deref()
            .map(|a| a.split('@').next().unwrap_or(a))
            .filter(|a| !a.is_empty())
            .unwrap_or(UNASSIGNED)
            .to_string();
        let entry = groups.entry(name).or_default();
        entry.0 += 1;
        if lead.is_won() {
            entry.1 += 1;
            entry.2 += lead.value;
        }
    }

    let mut rows: Vec<AssigneePerformance> = groups
        .into_iter()
        .map(|(name, (count, won, value))| AssigneePerformance {
            name,
            leads: count,
            won,
            value,
            conversion: percent(won, count),
        })
        .collect();
    rows.sort_by(|a, b| by_value_then_name(a.value, &a.name, b.value, &b.name));
    rows
}

/// Counts of leads per value bucket: <1L, 1L-5L, 5L-10L, 10L-50L, 50L+
pub fn deal_size_distribution(leads: &[Lead]) -> Vec<DealSizeBucket> {
    DEAL_SIZE_EDGES
        .iter()
        .enumerate()
        .map(|(i, &lower)| {
            let min = lower * LAKH;
            let max = DEAL_SIZE_EDGES.get(i + 1).map(|upper| upper * LAKH);
            let range = match max {
                _ if i == 0 => format!("< ₹{}", format_lakh(max.unwrap_or_default())),
                Some(max) => format!("₹{} - ₹{}", format_lakh(min), format_lakh(max)),
                None => format!("₹{}+", format_lakh(min)),
            };
            let count = leads
                .iter()
                .filter(|l| l.value >= min && max.map_or(true, |max| l.value < max))
                .count();
            DealSizeBucket {
                range,
                min,
                max,
                count,
            }
        })
        .collect()
}

/// Mean whole days from creation to last update over won leads. Leads
/// missing either timestamp are skipped; 0 without data.
pub fn avg_sales_cycle_days(leads: &[Lead]) -> f64 {
    let cycles: Vec<i64> = leads
        .iter()
        .filter(|l| l.is_won())
        .filter_map(|l| Some((l.updated_date? - l.created_date?).num_days()))
        .collect();
    if cycles.is_empty() {
        0.0
    } else {
        cycles.iter().sum::<i64>() as f64 / cycles.len() as f64
    }
}

/// Won value per contact industry, largest first
pub fn industry_revenue(leads: &[Lead], contacts: &[Contact]) -> Vec<NamedValue> {
    let index = contact_index(contacts);
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for lead in leads.iter().filter(|l| l.is_won()) {
        *groups.entry(industry_of(lead, &index)).or_default() += lead.value;
    }
    let mut rows: Vec<NamedValue> = groups
        .into_iter()
        .map(|(name, value)| NamedValue { name, value })
        .collect();
    rows.sort_by(|a, b| by_value_then_name(a.value, &a.name, b.value, &b.name));
    rows
}

/// Won value grouped by the month the lead was last updated (closed),
/// oldest first. Won leads without `updated_date` are skipped.
pub fn revenue_by_month(leads: &[Lead]) -> Vec<MonthlyRevenue> {
    let mut groups: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for lead in leads.iter().filter(|l| l.is_won()) {
        if let Some(closed) = lead.updated_date {
            *groups.entry((closed.year(), closed.month())).or_default() += lead.value;
        }
    }
    groups
        .into_iter()
        .map(|((year, month), revenue)| MonthlyRevenue {
            year,
            month,
            label: month_label(year, month, "%b %Y"),
            revenue,
        })
        .collect()
}

fn breakdown(leads: &[Lead], key: impl Fn(&Lead) -> String) -> Vec<BreakdownRow> {
    let mut groups: BTreeMap<String, (usize, usize, f64)> = BTreeMap::new();
    for lead in leads {
        let entry = groups.entry(key(lead)).or_default();
        entry.0 += 1;
        if lead.is_won() {
            entry.1 += 1;
        }
        entry.2 += lead.value;
    }

    let mut rows: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|(name, (count, won, value))| BreakdownRow {
            name,
            leads: count,
            won,
            value,
            conversion: percent(won, count),
        })
        .collect();
    rows.sort_by(|a, b| by_value_then_name(a.value, &a.name, b.value, &b.name));
    rows
}

fn contact_index(contacts: &[Contact]) -> HashMap<&str, &Contact> {
    contacts
        .iter()
        .filter_map(|c| c.id_str().map(|id| (id, c)))
        .collect()
}

fn contact_of<'a>(lead: &Lead, index: &HashMap<&str, &'a Contact>) -> Option<&'a Contact> {
    let id = lead.contact_id.as_ref()?;
    index.get(id.0.as_str()).copied()
}

fn industry_of(lead: &Lead, index: &HashMap<&str, &Contact>) -> String {
    contact_of(lead, index)
        .and_then(|c| c.industry.clone())
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn by_value_then_name(a_value: f64, a_name: &str, b_value: f64, b_name: &str) -> Ordering {
    b_value.total_cmp(&a_value).then_with(|| a_name.cmp(b_name))
}

/// `(year, month)` of the last `count` months up to and including `now`'s
fn trailing_months(now: DateTime<Utc>, count: u32) -> Vec<(i32, u32)> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

fn month_label(year: i32, month: u32, pattern: &str) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format(pattern).to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month))
}
