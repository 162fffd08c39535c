use crate::device::{DeviceType, Os, detect_device};
use crate::models::{CampaignRecord, ChartPoint, DistributionResult, SharePoint, UserRecord};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

pub const OS_CATEGORIES: [&str; 6] = ["Android", "iOS", "Windows", "MacOS", "Linux", "Other"];
pub const DEVICE_TYPE_CATEGORIES: [&str; 4] = ["Mobile", "Desktop", "Tablet", "Unknown"];

/// OS breakdown of users.
///
/// With both `campaigns` and `brand_id`, only users who scanned one of the
/// brand's campaigns are counted, each once. Otherwise every user with an
/// agent string is counted; users with neither `userAgent` nor `device` are
/// skipped.
pub fn calculate_device_distribution(
    users: &[UserRecord],
    campaigns: Option<&[CampaignRecord]>,
    brand_id: Option<&str>,
) -> DistributionResult {
    let mut counter = Counter::new(&OS_CATEGORIES);

    match (campaigns, brand_id) {
        (Some(campaigns), Some(brand_id)) => {
            for user in brand_scanners(users, campaigns, brand_id) {
                let info = detect_device(user.agent_string().unwrap_or(""));
                counter.bump(os_bucket(info.os));
            }
        }
        _ => {
            for user in users {
                let Some(agent) = user.agent_string() else {
                    debug!(user_id = %user.id, "skipping user without agent string");
                    continue;
                };
                counter.bump(os_bucket(detect_device(agent).os));
            }
        }
    }

    counter.finish()
}

/// Device type breakdown of users.
///
/// Same filtering as [`calculate_device_distribution`], except that in the
/// unfiltered path users with no agent string land in `Unknown` instead of
/// being skipped. On the campaign path the same users classify as `Desktop`.
pub fn calculate_device_type_distribution(
    users: &[UserRecord],
    campaigns: Option<&[CampaignRecord]>,
    brand_id: Option<&str>,
) -> DistributionResult {
    let mut counter = Counter::new(&DEVICE_TYPE_CATEGORIES);

    match (campaigns, brand_id) {
        (Some(campaigns), Some(brand_id)) => {
            for user in brand_scanners(users, campaigns, brand_id) {
                let info = detect_device(user.agent_string().unwrap_or(""));
                counter.bump(device_type_bucket(info.device_type));
            }
        }
        _ => {
            for user in users {
                match user.agent_string() {
                    Some(agent) => counter.bump(device_type_bucket(detect_device(agent).device_type)),
                    None => counter.bump("Unknown"),
                }
            }
        }
    }

    counter.finish()
}

impl DistributionResult {
    /// Chart entries with their share of `total_users`, in percent rounded to
    /// one decimal.
    pub fn shares(&self) -> Vec<SharePoint> {
        self.chart_data
            .iter()
            .map(|point| SharePoint {
                name: point.name.clone(),
                value: point.value,
                percent: percent(point.value, self.total_users),
            })
            .collect()
    }
}

fn percent(value: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = value as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}

/// Users who scanned any campaign of `brand_id`, in first-scan order, each
/// yielded once. Scans by ids missing from `users` are dropped.
fn brand_scanners<'a>(
    users: &'a [UserRecord],
    campaigns: &'a [CampaignRecord],
    brand_id: &str,
) -> Vec<&'a UserRecord> {
    let by_id: HashMap<&str, &UserRecord> = users.iter().map(|user| (user.id.as_str(), user)).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut matched = Vec::new();

    for campaign in campaigns.iter().filter(|campaign| campaign.client == brand_id) {
        for scan in &campaign.ip_address {
            if !seen.insert(scan.user_id.as_str()) {
                continue;
            }
            match by_id.get(scan.user_id.as_str()) {
                Some(user) => matched.push(*user),
                None => debug!(
                    campaign_id = %campaign.id,
                    user_id = %scan.user_id,
                    "scan references unknown user"
                ),
            }
        }
    }

    matched
}

fn os_bucket(os: Os) -> &'static str {
    match os {
        Os::WindowsPhone | Os::Unknown => "Other",
        mapped => mapped.label(),
    }
}

fn device_type_bucket(device_type: DeviceType) -> &'static str {
    device_type.label()
}

struct Counter {
    categories: &'static [&'static str],
    counts: Vec<u64>,
    fallback: usize,
}

impl Counter {
    /// The last category doubles as the bucket for unmapped names.
    fn new(categories: &'static [&'static str]) -> Self {
        Self {
            categories,
            counts: vec![0; categories.len()],
            fallback: categories.len() - 1,
        }
    }

    fn bump(&mut self, name: &str) {
        let index = self
            .categories
            .iter()
            .position(|category| *category == name)
            .unwrap_or(self.fallback);
        self.counts[index] = self.counts[index].saturating_add(1);
    }

    fn finish(self) -> DistributionResult {
        let chart_data: Vec<ChartPoint> = self
            .categories
            .iter()
            .zip(&self.counts)
            .map(|(name, value)| ChartPoint {
                name: (*name).to_string(),
                value: *value,
            })
            .collect();
        let counts: BTreeMap<String, u64> = chart_data
            .iter()
            .map(|point| (point.name.clone(), point.value))
            .collect();
        let total_users = self.counts.iter().sum();

        DistributionResult {
            chart_data,
            total_users,
            counts,
        }
    }
}
