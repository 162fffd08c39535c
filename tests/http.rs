use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36 Chrome/90 Mobile Safari/537.36";
const WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0 Safari/537.36 Edg/120.0";
const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) Version/16.0 Safari/604.1";

#[derive(Debug, Deserialize)]
struct ChartPoint {
    name: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DevicesResponse {
    device_data: Vec<ChartPoint>,
    device_type_data: Vec<ChartPoint>,
    total_users: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanRecordedResponse {
    new_user: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScanStats {
    hourly: Vec<ChartPoint>,
    monthly: Vec<ChartPoint>,
    total_scans: u64,
}

fn value(points: &[ChartPoint], name: &str) -> u64 {
    points
        .iter()
        .find(|point| point.name == name)
        .map(|point| point.value)
        .expect("missing category")
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("campaign_analytics_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

fn seed_data(path: &str) {
    let seed = serde_json::json!({
        "users": [
            { "id": "u-android", "userAgent": ANDROID_UA },
            { "id": "u-windows", "userAgent": WINDOWS_UA },
            { "id": "u-bare" }
        ],
        "campaigns": [
            {
                "id": "c-spring",
                "client": "brand-a",
                "ipAddress": [
                    { "userId": "u-android", "createdAt": "2026-03-01T09:00:00Z" },
                    { "userId": "u-android", "createdAt": "2026-03-02T09:30:00Z" }
                ]
            },
            { "id": "c-other", "client": "brand-b", "ipAddress": [] }
        ]
    });
    std::fs::write(path, serde_json::to_vec_pretty(&seed).unwrap()).expect("write seed data");
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/devices")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    seed_data(&data_path);
    let child = Command::new(env!("CARGO_BIN_EXE_campaign_analytics"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn brand_devices(client: &Client, base_url: &str, brand: &str) -> DevicesResponse {
    client
        .get(format!("{base_url}/api/brands/{brand}/devices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_devices_cover_all_users() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let devices: DevicesResponse = client
        .get(format!("{}/api/devices", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(devices.device_data.len(), 6);
    assert_eq!(devices.device_type_data.len(), 4);
    assert!(value(&devices.device_data, "Android") >= 1);
    assert!(value(&devices.device_data, "Windows") >= 1);
    let sum: u64 = devices.device_data.iter().map(|point| point.value).sum();
    assert_eq!(sum, devices.total_users);
}

#[tokio::test]
async fn http_brand_scan_counts_new_user_once() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = brand_devices(&client, &server.base_url, "brand-a").await;
    assert_eq!(value(&before.device_data, "Android"), 1);

    let user_id = format!("u-ipad-{}", std::process::id());
    for expect_new in [true, false] {
        let recorded: ScanRecordedResponse = client
            .post(format!("{}/api/campaigns/c-spring/scans", server.base_url))
            .header("User-Agent", IPAD_UA)
            .json(&serde_json::json!({ "userId": user_id }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(recorded.new_user, expect_new);
    }

    let after = brand_devices(&client, &server.base_url, "brand-a").await;
    assert_eq!(after.total_users, before.total_users + 1);
    assert_eq!(value(&after.device_data, "iOS"), value(&before.device_data, "iOS") + 1);
    assert_eq!(
        value(&after.device_type_data, "Tablet"),
        value(&before.device_type_data, "Tablet") + 1
    );

    let other = brand_devices(&client, &server.base_url, "brand-b").await;
    assert_eq!(other.total_users, 0);
}

#[tokio::test]
async fn http_brand_scan_stats_buckets_scans() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let stats: ScanStats = client
        .get(format!("{}/api/brands/brand-a/scans", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats.hourly.len(), 24);
    assert_eq!(stats.monthly.len(), 12);
    assert!(value(&stats.hourly, "09:00") >= 2);
    let hourly_sum: u64 = stats.hourly.iter().map(|point| point.value).sum();
    assert_eq!(hourly_sum, stats.total_scans);
}

#[tokio::test]
async fn http_rejects_bad_scans() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let missing = client
        .post(format!("{}/api/campaigns/nope/scans", server.base_url))
        .json(&serde_json::json!({ "userId": "u-android" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let empty = client
        .post(format!("{}/api/campaigns/c-spring/scans", server.base_url))
        .json(&serde_json::json!({ "userId": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_user_device_and_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let info: serde_json::Value = client
        .get(format!("{}/api/users/u-windows/device", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["os"], "Windows");
    assert_eq!(info["browser"], "Edge");
    assert_eq!(info["deviceType"], "Desktop");

    let unknown = client
        .get(format!("{}/api/users/nobody/device", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);

    let page = client
        .get(format!("{}/brands/brand-a", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(page.status().is_success());
    let body = page.text().await.unwrap();
    assert!(body.contains("brand-a"));
    assert!(body.contains("Operating system"));
}
