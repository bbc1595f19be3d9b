#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use rust_xlsxwriter::Workbook;

pub const USER: &str = "sync-user";
pub const PASSWORD: &str = "s3cret";
/// `Basic base64("sync-user:s3cret")`
pub const EXPECTED_BASIC: &str = "Basic c3luYy11c2VyOnMzY3JldA==";
pub const STUB_TOKEN: &str = "stub-token";

#[derive(Debug, Clone)]
pub struct ReceivedBatch {
    pub customer: String,
    pub store: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// Shared state of the stand-in price-sync service.
#[derive(Clone, Default)]
pub struct StubService {
    pub token_calls: Arc<AtomicUsize>,
    pub batches: Arc<Mutex<Vec<ReceivedBatch>>>,
    /// 1-based batch number the service rejects with a 500.
    pub fail_batch: Option<usize>,
    pub batch_delay: Option<Duration>,
}

impl StubService {
    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<ReceivedBatch> {
        self.batches.lock().unwrap().clone()
    }
}

async fn token(State(service): State<StubService>, headers: HeaderMap) -> (StatusCode, String) {
    service.token_calls.fetch_add(1, Ordering::SeqCst);
    let authorization = headers.get("authorization").and_then(|v| v.to_str().ok());
    if authorization == Some(EXPECTED_BASIC) {
        (
            StatusCode::OK,
            format!(r#"{{"access_token":"{STUB_TOKEN}","token_type":"bearer"}}"#),
        )
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials".to_string())
    }
}

async fn integration(
    State(service): State<StubService>,
    UrlPath((customer, store)): UrlPath<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, String) {
    if let Some(delay) = service.batch_delay {
        tokio::time::sleep(delay).await;
    }
    let number = {
        let mut batches = service.batches.lock().unwrap();
        batches.push(ReceivedBatch {
            customer,
            store,
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(String::from),
            body,
        });
        batches.len()
    };
    if service.fail_batch == Some(number) {
        (StatusCode::INTERNAL_SERVER_ERROR, "batch rejected".to_string())
    } else {
        (StatusCode::OK, r#"{"code":0}"#.to_string())
    }
}

/// Serve the stub on an ephemeral port and return its base URL.
pub async fn spawn_stub(service: StubService) -> String {
    let app = Router::new()
        .route("/proxy/token", post(token))
        .route("/proxy/integration/{customer}/{store}", post(integration))
        .with_state(service);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Price workbook with the standard header. A `None` id leaves the cell blank.
pub fn write_price_workbook(path: &Path, ids: &[Option<&str>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["ItemID", "ItemName", "ItemNumber", "PrimaryUpc", "UnitPrice"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, id) in ids.iter().enumerate() {
        let row = (i + 1) as u32;
        if let Some(id) = id {
            sheet.write_string(row, 0, *id).unwrap();
        }
        sheet.write_string(row, 1, format!("Item {i}")).unwrap();
        sheet.write_string(row, 2, "4133").unwrap();
        sheet.write_string(row, 3, "0001").unwrap();
        sheet.write_number(row, 4, 2.5).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Minimal YAML config pointing at `base_url`, with logs kept under `root`.
pub fn write_config(root: &Path, watch: &Path, base_url: &str, batch_size: usize) -> std::path::PathBuf {
    let config_path = root.join("sync.yaml");
    let yaml = format!(
        "sync:\n  watch_folder: {watch}\n  batch_size: {batch_size}\n  poll_interval_secs: 1\n  store:\n    customer_code: eastwest\n    store_code: teststore\napi:\n  base_url: {base_url}/\n  upload_timeout_secs: 5\nlogging:\n  directory: {logs}\n",
        watch = watch.display(),
        logs = root.join("logs").display(),
    );
    std::fs::write(&config_path, yaml).unwrap();
    config_path
}
