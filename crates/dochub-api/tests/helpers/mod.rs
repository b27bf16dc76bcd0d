//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use dochub_api::{build_app, build_state};
use dochub_core::config::AppConfig;
use dochub_database::MemoryStore;
use dochub_storage::LocalStorageProvider;

const BOUNDARY: &str = "dochub-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for direct assertions
    pub store: Arc<MemoryStore>,
    _dir: TempDir,
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is JSON")
    }

    /// Each non-empty body line parsed as JSON.
    pub fn lines(&self) -> Vec<Value> {
        std::str::from_utf8(&self.body)
            .expect("utf-8 body")
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_str(l).expect("line is JSON"))
            .collect()
    }

    pub fn stages(&self) -> Vec<String> {
        self.lines()
            .iter()
            .map(|v| v["stage"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}

/// One multipart part: field name, optional file name, content.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

impl TestApp {
    /// Create a new test application on the in-memory store.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = dir.path().to_str().expect("utf-8 temp path").to_string();
        let config: AppConfig = serde_json::from_value(json!({
            "database": { "url": "postgres://unused/dochub" },
            "storage": { "root_path": root, "max_upload_size_bytes": 4096 }
        }))
        .expect("valid test config");

        let provider = LocalStorageProvider::new(&root)
            .await
            .expect("Failed to init storage");
        let store = Arc::new(MemoryStore::new());
        let state = build_state(config, store.clone(), store.clone(), Arc::new(provider), None);

        Self {
            router: build_app(state),
            store,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();
        TestResponse {
            status,
            content_type,
            body,
        }
    }

    /// Make a request with an optional JSON body.
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.send(request).await
    }

    /// POST a multipart form.
    pub async fn multipart(&self, uri: &str, parts: &[Part<'_>]) -> TestResponse {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match file_name {
                Some(file_name) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    /// Folder upload where each file's content is its path.
    pub async fn upload(&self, uri: &str, paths: &[&str]) -> TestResponse {
        let mut parts: Vec<Part<'_>> = Vec::new();
        for path in paths {
            parts.push(("paths", None, path.as_bytes()));
        }
        for path in paths {
            let file_name = path.rsplit('/').next().unwrap_or(path);
            parts.push(("files", Some(file_name), path.as_bytes()));
        }
        self.multipart(uri, &parts).await
    }

    /// Create a folder through the API and return its id.
    pub async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(json!({ "name": name, "parent_id": parent_id })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()["data"]["id"]
            .as_str()
            .expect("folder id")
            .to_string()
    }
}
