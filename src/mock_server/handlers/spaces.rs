//! Space endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{check_auth, error_response, job_resource, paginate, ListParams};
use crate::mock_server::state::{Deletion, MockState};
use crate::{JobStatusV2, Metadata, Resource, Space, SpaceEntity};

/// Query parameters accepted by v2 DELETE endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(rename = "async", default)]
    pub run_async: bool,
    #[serde(default)]
    pub recursive: bool,
}

/// Render a space as a v2 resource.
pub fn space_resource(space: &Space) -> Resource<SpaceEntity> {
    Resource {
        metadata: Metadata {
            guid: space.id.clone(),
            url: Some(format!("/v2/spaces/{}", space.id)),
            created_at: space.created_at,
            updated_at: None,
        },
        entity: SpaceEntity {
            name: space.name.clone(),
            organization_guid: space.organization_id.clone(),
            space_quota_definition_guid: space.space_quota_id.clone(),
            allow_ssh: space.allow_ssh,
        },
    }
}

/// GET /v2/organizations/{guid}/spaces
pub async fn list_spaces(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(organization_id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    let params = ListParams::from_pairs(&pairs);
    let spaces = state.list_spaces(&organization_id, params.name.as_deref());
    let path = format!("/v2/organizations/{organization_id}/spaces");
    let page = paginate(&spaces, &params, &path, space_resource);

    (StatusCode::OK, Json(page)).into_response()
}

/// DELETE /v2/spaces/{guid}
pub async fn delete_space(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(space_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    if state.get_space(&space_id).is_none() {
        return error_response(
            StatusCode::NOT_FOUND,
            40004,
            "CF-SpaceNotFound",
            format!("The app space could not be found: {space_id}"),
        );
    }

    if params.run_async {
        let job = state.start_job(Some(Deletion::Space(space_id)));
        let body = job_resource(&job.id, JobStatusV2::Queued, None);
        return (StatusCode::ACCEPTED, Json(body)).into_response();
    }

    state.delete_space(&space_id);
    StatusCode::NO_CONTENT.into_response()
}
