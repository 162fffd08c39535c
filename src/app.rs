use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/brands/:brand_id", get(handlers::brand_index))
        .route("/api/devices", get(handlers::get_devices))
        .route("/api/brands/:brand_id/devices", get(handlers::get_brand_devices))
        .route("/api/brands/:brand_id/scans", get(handlers::get_brand_scans))
        .route("/api/users/:user_id/device", get(handlers::get_user_device))
        .route("/api/campaigns/:campaign_id/scans", post(handlers::record_scan))
        .with_state(state)
}
