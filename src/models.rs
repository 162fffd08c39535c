use crate::device::{Browser, DeviceType, Os};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl UserRecord {
    /// The string handed to the classifier: `userAgent`, else `device`.
    pub fn agent_string(&self) -> Option<&str> {
        self.user_agent
            .as_deref()
            .filter(|ua| !ua.is_empty())
            .or_else(|| self.device.as_deref().filter(|d| !d.is_empty()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub client: String,
    #[serde(default)]
    pub ip_address: Vec<ScanEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(default)]
    pub campaigns: Vec<CampaignRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub os: Os,
    pub device_type: DeviceType,
    pub browser: Browser,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartPoint {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SharePoint {
    pub name: String,
    pub value: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    pub chart_data: Vec<ChartPoint>,
    pub total_users: u64,
    pub counts: BTreeMap<String, u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicesResponse {
    pub brand_id: Option<String>,
    pub device_data: Vec<ChartPoint>,
    pub device_type_data: Vec<ChartPoint>,
    pub total_users: u64,
    pub device_type_total_users: u64,
    pub device_shares: Vec<SharePoint>,
    pub device_type_shares: Vec<SharePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub brand_id: String,
    pub year: i32,
    pub hourly: Vec<ChartPoint>,
    pub monthly: Vec<ChartPoint>,
    pub total_scans: u64,
    pub unique_users: u64,
    pub campaign_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub user_id: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecordedResponse {
    pub campaign_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub new_user: bool,
    pub scan_count: u64,
}
