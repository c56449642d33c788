//! Job endpoint handlers.
//!
//! Every status request advances the job by one scripted state.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{check_auth, error_response};
use crate::mock_server::state::MockState;
use crate::{
    ApiErrorV3, JobEntity, JobErrorDetails, JobResource, JobStateV3, JobStatusV2, JobV3, Metadata,
    Resource,
};

/// Render a job as a v2 resource.
pub fn job_resource(
    id: &str,
    status: JobStatusV2,
    error_details: Option<JobErrorDetails>,
) -> JobResource {
    Resource {
        metadata: Metadata {
            guid: id.to_string(),
            url: Some(format!("/v2/jobs/{id}")),
            created_at: None,
            updated_at: None,
        },
        entity: JobEntity {
            guid: Some(id.to_string()),
            status,
            error_details,
        },
    }
}

/// Render a job in the v3 format.
pub fn job_v3(id: &str, status: JobStatusV2, error_details: Option<JobErrorDetails>) -> JobV3 {
    let state = match status {
        JobStatusV2::Queued | JobStatusV2::Running => JobStateV3::Processing,
        JobStatusV2::Finished => JobStateV3::Complete,
        JobStatusV2::Failed => JobStateV3::Failed,
    };
    let errors = error_details
        .map(|details| ApiErrorV3 {
            code: details.code,
            title: details.error_code,
            detail: details.description,
        })
        .into_iter()
        .collect();

    JobV3 {
        guid: id.to_string(),
        state,
        operation: Some("service_instance.delete".to_string()),
        errors,
    }
}

fn job_not_found(id: &str) -> axum::response::Response {
    error_response(
        StatusCode::NOT_FOUND,
        10000,
        "CF-NotFound",
        format!("Job not found: {id}"),
    )
}

/// GET /v2/jobs/{guid}
pub async fn get_job(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    match state.poll_job(&id) {
        Some((status, failure)) => {
            (StatusCode::OK, Json(job_resource(&id, status, failure))).into_response()
        }
        None => job_not_found(&id),
    }
}

/// GET /v3/jobs/{guid}
pub async fn get_job_v3(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    match state.poll_job(&id) {
        Some((status, failure)) => {
            (StatusCode::OK, Json(job_v3(&id, status, failure))).into_response()
        }
        None => job_not_found(&id),
    }
}
