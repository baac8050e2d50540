use axum::{Router, body::Body, http::Request, response::Response};
use camlink::{
    config::{Config, LogsConfig, SerialConfig, ServerConfig},
    server::{self, handlers::AppState},
    storage::ImageStore,
};
use serde_json::Value;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tempfile::TempDir;

/// Smallest byte sequence shaped like a JPEG: SOI, a JFIF APP0 stub, EOI
pub const SAMPLE_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

/// Create a test configuration with sensible defaults
pub fn create_test_config(upload_dir: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            upload_dir: upload_dir.to_string(),
            max_upload_bytes: 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        serial: SerialConfig::default(),
    }
}

/// Router backed by a fresh upload directory inside a temp dir
pub async fn create_test_app() -> (Router, TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let upload_dir = temp_dir.path().join("uploaded_images");
    let config = create_test_config(&upload_dir.to_string_lossy());

    let store = ImageStore::new(&upload_dir).await.unwrap();
    let app_state = AppState {
        store: Arc::new(store),
    };
    let app = server::router(app_state, config.server.max_upload_bytes);

    (app, temp_dir, upload_dir)
}

pub fn upload_request(content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/upload");
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    builder.body(body.into()).unwrap()
}

pub fn status_request() -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri("/status")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Files currently in the upload directory, sorted by name
pub fn stored_files(upload_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(upload_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// True if the name looks like `esp32cam_YYYYMMDD_HHMMSS.jpg`
pub fn is_image_filename(name: &str) -> bool {
    let Some(stamp) = name
        .strip_prefix("esp32cam_")
        .and_then(|rest| rest.strip_suffix(".jpg"))
    else {
        return false;
    };
    stamp.len() == 15
        && stamp.char_indices().all(|(i, c)| {
            if i == 8 {
                c == '_'
            } else {
                c.is_ascii_digit()
            }
        })
}
