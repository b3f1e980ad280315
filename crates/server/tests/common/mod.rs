//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock media processor injected, so the full upload path can be
//! exercised without ffmpeg installed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use speedshift_core::{testing::MockProcessor, Config, ProcessorConfig, TranscodeRunner};

const BOUNDARY: &str = "speedshift-test-boundary";

/// Test fixture for E2E testing with a mock media processor.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new().await;
///     let response = fixture
///         .upload(Some(("clip.mp4", b"video")), Some("2"))
///         .await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock processor - script exits, delays and artifacts
    pub processor: Arc<MockProcessor>,
    /// Scratch root for per-request directories
    pub scratch_root: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a test fixture from a custom configuration.
    ///
    /// The scratch root is always redirected into a fresh temp dir.
    pub async fn with_config(mut config: Config) -> Self {
        let scratch_root = TempDir::new().expect("Failed to create temp dir");
        config.processor = ProcessorConfig {
            scratch_root: scratch_root.path().to_path_buf(),
            ..config.processor
        };

        let processor = Arc::new(MockProcessor::new());
        let runner = Arc::new(TranscodeRunner::from_config(
            Arc::clone(&processor) as Arc<dyn speedshift_core::MediaProcessor>,
            &config,
        ));

        let state = Arc::new(speedshift_server::state::AppState::new(config, runner));
        let router = speedshift_server::api::create_router(state);

        Self {
            router,
            processor,
            scratch_root,
        }
    }

    /// Number of scratch directories currently on disk.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch_root.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart upload to `/api/v1/transcode`.
    ///
    /// `file` is `(filename, bytes)`; either part may be omitted.
    pub async fn upload(&self, file: Option<(&str, &[u8])>, speed: Option<&str>) -> TestResponse {
        let body = multipart_body(file, speed);
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/transcode")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

/// Build a `multipart/form-data` body with the fixture boundary.
pub fn multipart_body(file: Option<(&str, &[u8])>, speed: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(speed) = speed {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"speed\"\r\n\r\n");
        body.extend_from_slice(speed.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((filename, data)) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
