pub mod aggregation;
pub mod service;

use contracts::dashboards::d400_lead_analytics::SUPPORTED_WINDOWS;

pub fn is_supported_window(months: u32) -> bool {
    SUPPORTED_WINDOWS.contains(&months)
}
