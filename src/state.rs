use crate::config::Config;
use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Snapshot of users and campaigns plus the file it is persisted to.
///
/// Aggregations run against the locked snapshot; nothing derived is cached.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(config: &Config, data: AppData) -> Self {
        Self {
            data_path: config.data_path.clone(),
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Run a read-only computation over the current snapshot.
    pub async fn read<R>(&self, f: impl FnOnce(&AppData) -> R) -> R {
        let data = self.data.lock().await;
        f(&data)
    }
}
