use crate::device::detect_device;
use crate::distribution::{calculate_device_distribution, calculate_device_type_distribution};
use crate::errors::AppError;
use crate::models::{
    AppData, DeviceInfo, DevicesResponse, ScanEvent, ScanRecordedResponse, ScanRequest, ScanStats,
    UserRecord,
};
use crate::state::AppState;
use crate::stats::build_scan_stats;
use crate::storage::persist_data;
use crate::ui::render_dashboard;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, header::USER_AGENT},
    response::Html,
};
use chrono::Utc;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.read(|data| render_dashboard(&devices_for(data, None))).await)
}

pub async fn brand_index(State(state): State<AppState>, Path(brand_id): Path<String>) -> Html<String> {
    Html(
        state
            .read(|data| render_dashboard(&devices_for(data, Some(&brand_id))))
            .await,
    )
}

pub async fn get_devices(State(state): State<AppState>) -> Result<Json<DevicesResponse>, AppError> {
    Ok(Json(state.read(|data| devices_for(data, None)).await))
}

pub async fn get_brand_devices(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> Result<Json<DevicesResponse>, AppError> {
    Ok(Json(state.read(|data| devices_for(data, Some(&brand_id))).await))
}

pub async fn get_brand_scans(
    State(state): State<AppState>,
    Path(brand_id): Path<String>,
) -> Result<Json<ScanStats>, AppError> {
    Ok(Json(state.read(|data| build_scan_stats(data, &brand_id)).await))
}

pub async fn get_user_device(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DeviceInfo>, AppError> {
    let info = state
        .read(|data| {
            data.users
                .iter()
                .find(|user| user.id == user_id)
                .map(|user| detect_device(user.agent_string().unwrap_or("")))
        })
        .await
        .ok_or_else(|| AppError::not_found(format!("unknown user '{user_id}'")))?;

    Ok(Json(info))
}

pub async fn record_scan(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
    headers: HeaderMap,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanRecordedResponse>, AppError> {
    let user_id = payload.user_id.trim().to_string();
    if user_id.is_empty() {
        return Err(AppError::bad_request("userId must not be empty"));
    }

    let user_agent = payload.user_agent.filter(|ua| !ua.is_empty()).or_else(|| {
        headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    });

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let response = apply_scan(&mut next, &campaign_id, &user_id, user_agent)?;
    persist_data(&state.data_path, &next).await?;
    *data = next;

    info!(
        campaign_id = %response.campaign_id,
        user_id = %response.user_id,
        new_user = response.new_user,
        "recorded scan"
    );
    Ok(Json(response))
}

fn apply_scan(
    data: &mut AppData,
    campaign_id: &str,
    user_id: &str,
    user_agent: Option<String>,
) -> Result<ScanRecordedResponse, AppError> {
    let created_at = Utc::now();
    let campaign = data
        .campaigns
        .iter_mut()
        .find(|campaign| campaign.id == campaign_id)
        .ok_or_else(|| AppError::not_found(format!("unknown campaign '{campaign_id}'")))?;

    campaign.ip_address.push(ScanEvent {
        user_id: user_id.to_string(),
        created_at,
    });
    let scan_count = campaign.ip_address.len() as u64;

    let new_user = !data.users.iter().any(|user| user.id == user_id);
    if new_user {
        data.users.push(UserRecord {
            id: user_id.to_string(),
            user_agent,
            device: None,
        });
    }

    Ok(ScanRecordedResponse {
        campaign_id: campaign_id.to_string(),
        user_id: user_id.to_string(),
        created_at,
        new_user,
        scan_count,
    })
}

fn devices_for(data: &AppData, brand_id: Option<&str>) -> DevicesResponse {
    let campaigns = brand_id.map(|_| data.campaigns.as_slice());
    let os = calculate_device_distribution(&data.users, campaigns, brand_id);
    let kind = calculate_device_type_distribution(&data.users, campaigns, brand_id);

    DevicesResponse {
        brand_id: brand_id.map(str::to_string),
        device_shares: os.shares(),
        device_type_shares: kind.shares(),
        total_users: os.total_users,
        device_type_total_users: kind.total_users,
        device_data: os.chart_data,
        device_type_data: kind.chart_data,
    }
}
