//! Cloud Foundry client operations library.
//!
//! Asynchronous building blocks for talking to the Cloud Foundry cloud
//! controller: flattening paginated listings into streams, waiting for
//! platform jobs, and composing both into name-based operations.
//!
//! # Quick Start
//!
//! ```no_run
//! use cfops::{CfClient, CloudFoundryOperations, PollConfig};
//! use futures::TryStreamExt;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> cfops::Result<()> {
//!     // Create client from environment variables
//!     let client = CfClient::from_env()?;
//!
//!     let operations = CloudFoundryOperations::builder(client)
//!         .organization("my-org")
//!         .space("dev")
//!         .poll_config(PollConfig::default().with_timeout(Duration::from_secs(300)))
//!         .build();
//!
//!     // List all spaces of the organization, across every page
//!     let spaces: Vec<_> = operations.spaces().try_collect().await?;
//!     println!("Found {} spaces", spaces.len());
//!
//!     // Delete a service instance by name and wait for the broker
//!     operations.delete_service_instance("my-db").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`aggregate`] turns a page fetcher into a lazy [`Paginator`] stream.
//! - [`await_job`] polls a [`JobStatusFetcher`] until a job ends.
//! - [`resolve_by_name`] and [`act_then_await`] compose the two.
//! - [`List`] and [`Delete`] are implemented by the resource models and
//!   back [`CloudFoundryOperations`].
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `CF_API_URL` (required) - Cloud controller endpoint
//! - `CF_ACCESS_TOKEN` (required) - OAuth bearer token

pub mod cli;
mod client;
mod error;
pub mod job;
mod models;
pub mod operations;
pub mod output;
pub mod pagination;
pub mod query;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{CfClient, JobsV3};
pub use error::{CfError, ErrorKind, Result};
pub use job::{await_job, Backoff, JobHandle, JobState, JobStatus, JobStatusFetcher, PollConfig};
pub use operations::{
    act_then_await, act_then_await_with, resolve_by_name, CloudFoundryOperations,
    CloudFoundryOperationsBuilder, Completed, MutationResponse, OperationTracker, Phase,
};
pub use output::PrettyPrint;
pub use pagination::{aggregate, collect_all, Page, Paginator};
pub use query::{Filter, FilterOperator, ListQuery, OrderDirection};

// Re-export traits
pub use traits::{Delete, List, ListStream};

// Re-export models
pub use models::{
    // Envelopes
    Link,
    Metadata,
    Named,
    PaginatedResponse,
    PaginatedResponseV3,
    Pagination,
    Resource,
    // Organizations
    Organization,
    OrganizationEntity,
    // Spaces
    Space,
    SpaceEntity,
    // Space quotas
    SpaceQuota,
    SpaceQuotaDefinitionEntity,
    // Service instances
    LastOperation,
    ServiceInstance,
    ServiceInstanceEntity,
    ServiceInstanceType,
    // Jobs
    ApiErrorV3,
    JobEntity,
    JobErrorDetails,
    JobResource,
    JobStateV3,
    JobStatusV2,
    JobV3,
};
