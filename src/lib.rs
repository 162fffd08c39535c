pub mod app;
pub mod config;
pub mod device;
pub mod distribution;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use device::detect_device;
pub use distribution::{calculate_device_distribution, calculate_device_type_distribution};
pub use state::AppState;
pub use storage::load_data;
