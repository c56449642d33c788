//! Mock Cloud Foundry API server.
//!
//! Provides an axum-based HTTP server that simulates the cloud controller.

use std::io;
use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Cloud Foundry API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> io::Result<Self> {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_empty() -> io::Result<Self> {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn with_state(state: MockState) -> io::Result<Self> {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "mock server stopped");
            }
        });

        Ok(Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        })
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `CfClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();
        state.organizations = scenario.organizations;
        state.spaces = scenario.spaces;
        state.space_quotas = scenario.space_quotas;
        state.service_instances = scenario.service_instances;
        state
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Organization routes
            .route("/v2/organizations", get(handlers::list_organizations))
            .route(
                "/v2/organizations/:guid/space_quota_definitions",
                get(handlers::list_space_quotas),
            )
            // Space routes
            .route(
                "/v2/organizations/:guid/spaces",
                get(handlers::list_spaces),
            )
            .route("/v2/spaces/:guid", delete(handlers::delete_space))
            // Service instance routes
            .route(
                "/v2/spaces/:guid/service_instances",
                get(handlers::list_service_instances),
            )
            .route(
                "/v2/service_instances/:guid",
                delete(handlers::delete_service_instance),
            )
            .route(
                "/v2/user_provided_service_instances/:guid",
                delete(handlers::delete_user_provided_service_instance),
            )
            // Job routes
            .route("/v2/jobs/:guid", get(handlers::get_job))
            .route("/v3/jobs/:guid", get(handlers::get_job_v3))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CfClient, List, ListQuery, Organization};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await.unwrap();

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_organizations_with_client() {
        let server = MockServer::start().await.unwrap();
        let client = CfClient::new("test-token", server.url()).unwrap();

        let page = Organization::list_page(&client, &(), &ListQuery::new(), 1)
            .await
            .expect("Failed to list organizations");

        assert_eq!(page.len(), 2);
        assert_eq!(page.items[0].name, "test-org");
        assert!(!page.has_more());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_router_requires_token_when_configured() {
        let state = MockState::new().with_required_token("secret").shared();
        let app = MockServer::create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v2/organizations")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let app = MockServer::create_router(MockState::new().shared());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v2/jobs/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
