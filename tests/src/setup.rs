//! Common test setup functions.

use api::{router, state::AppState};
use axum::Router;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use std::sync::Arc;

use crate::mocks::{MockSource, MockStore};

/// Test context wiring the real router to in-process mocks.
///
/// - The router is the production one, with every layer
/// - `MockStore` implements `RecordStore` with failure injection
/// - `MockSource` implements `PageSource` with scripted pages
pub struct TestContext {
    pub store: MockStore,
    pub source: MockSource,
    pub router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MockStore::new();
        let source = MockSource::new();

        let state = AppState::new(Arc::new(store.clone()), Arc::new(source.clone()));
        let router = router(state);

        Self {
            store,
            source,
            router,
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Uploads `body` as multipart field `file` under the given file name.
pub async fn upload(server: &TestServer, file_name: &str, body: impl Into<String>) -> TestResponse {
    let part = Part::bytes(body.into().into_bytes())
        .file_name(file_name)
        .mime_type("text/csv");

    server
        .post("/upload")
        .multipart(MultipartForm::new().add_part("file", part))
        .await
}
