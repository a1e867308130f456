// Common test utilities and helpers
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use parking_state::{api, db, AppState, Config};

/// Router over a throwaway directory holding the state file, the tokens file
/// and the static assets.
pub struct TestApp {
    pub dir: TempDir,
    pub config: Config,
    pub router: Router,
}

impl TestApp {
    /// Local-file mode, as with an empty environment.
    pub fn local() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::local(dir.path());
        Self::build(dir, config)
    }

    /// Goes through backend selection with the given remote credentials.
    pub fn with_config(dir: TempDir, config: Config) -> Self {
        Self::build(dir, config)
    }

    fn build(dir: TempDir, config: Config) -> Self {
        std::fs::create_dir_all(&config.static_dir).expect("Failed to create static dir");
        let backend = db::select_backend(config.remote.as_ref());
        let router = api::router(Arc::new(AppState::new(config.clone(), backend)));
        Self {
            dir,
            config,
            router,
        }
    }

    pub fn write_tokens(&self, tokens: &Value) {
        std::fs::write(&self.config.tokens_file, tokens.to_string())
            .expect("Failed to write tokens file");
    }

    pub fn write_state(&self, state: &Value) {
        std::fs::write(&self.config.state_file, state.to_string())
            .expect("Failed to write state file");
    }

    pub fn write_static(&self, name: &str, contents: &str) {
        std::fs::write(self.config.static_dir.join(name), contents)
            .expect("Failed to write static file");
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> TestResponse {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
