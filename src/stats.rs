use crate::models::{AppData, ChartPoint, ScanStats};
use chrono::{Datelike, Timelike, Utc};
use std::collections::HashSet;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn build_scan_stats(data: &AppData, brand_id: &str) -> ScanStats {
    build_scan_stats_at(Utc::now().year(), data, brand_id)
}

/// Scan timeline of one brand. Hours cover every scan; months only scans
/// inside `year`. All bucketing is in UTC.
pub fn build_scan_stats_at(year: i32, data: &AppData, brand_id: &str) -> ScanStats {
    let mut hourly = [0u64; 24];
    let mut monthly = [0u64; 12];
    let mut total_scans = 0u64;
    let mut campaign_count = 0u64;
    let mut users: HashSet<&str> = HashSet::new();

    for campaign in data.campaigns.iter().filter(|campaign| campaign.client == brand_id) {
        campaign_count += 1;
        for scan in &campaign.ip_address {
            total_scans = total_scans.saturating_add(1);
            users.insert(scan.user_id.as_str());

            let at = scan.created_at;
            let hour = at.hour() as usize;
            hourly[hour] = hourly[hour].saturating_add(1);
            if at.year() == year {
                let month = at.month0() as usize;
                monthly[month] = monthly[month].saturating_add(1);
            }
        }
    }

    ScanStats {
        brand_id: brand_id.to_string(),
        year,
        hourly: hourly
            .iter()
            .enumerate()
            .map(|(hour, value)| ChartPoint {
                name: hour_label(hour),
                value: *value,
            })
            .collect(),
        monthly: MONTH_LABELS
            .iter()
            .zip(monthly)
            .map(|(name, value)| ChartPoint {
                name: (*name).to_string(),
                value,
            })
            .collect(),
        total_scans,
        unique_users: users.len() as u64,
        campaign_count,
    }
}

fn hour_label(hour: usize) -> String {
    format!("{hour:02}:00")
}
