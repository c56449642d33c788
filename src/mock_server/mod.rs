//! Mock Cloud Foundry API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the cloud
//! controller for integration and end-to-end testing. Unlike wiremock which
//! mocks at the HTTP level per-test, this server maintains state across
//! requests: jobs advance one state per status request and deletions take
//! effect when their job finishes.
//!
//! # Example
//!
//! ```ignore
//! use cfops::mock_server::MockServer;
//! use cfops::{CfClient, CloudFoundryOperations};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await.unwrap();
//!     let client = CfClient::new("test-token", server.url()).unwrap();
//!
//!     let operations = CloudFoundryOperations::builder(client)
//!         .organization("test-org")
//!         .build();
//!     let space = operations.get_space("dev").await.unwrap();
//!     assert_eq!(space.id, "space-1");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{Deletion, MockJob, MockState, DEFAULT_JOB_SCRIPT};
