//! Service instance endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{check_auth, error_response, job_resource, paginate, DeleteParams, ListParams};
use crate::mock_server::state::{Deletion, MockState};
use crate::{JobStatusV2, Metadata, Resource, ServiceInstance, ServiceInstanceEntity};

/// Render a service instance as a v2 resource.
pub fn service_instance_resource(instance: &ServiceInstance) -> Resource<ServiceInstanceEntity> {
    Resource {
        metadata: Metadata {
            guid: instance.id.clone(),
            url: Some(format!("/v2/service_instances/{}", instance.id)),
            created_at: None,
            updated_at: None,
        },
        entity: ServiceInstanceEntity {
            name: instance.name.clone(),
            instance_type: instance.instance_type,
            space_guid: instance.space_id.clone(),
            service_plan_guid: None,
            dashboard_url: instance.dashboard_url.clone(),
            last_operation: instance.last_operation.clone(),
        },
    }
}

fn instance_not_found(id: &str) -> axum::response::Response {
    error_response(
        StatusCode::NOT_FOUND,
        60004,
        "CF-ServiceInstanceNotFound",
        format!("The service instance could not be found: {id}"),
    )
}

/// GET /v2/spaces/{guid}/service_instances
pub async fn list_service_instances(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(space_id): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    let params = ListParams::from_pairs(&pairs);
    let instances = state.list_service_instances(&space_id, params.name.as_deref());
    let path = format!("/v2/spaces/{space_id}/service_instances");
    let page = paginate(&instances, &params, &path, service_instance_resource);

    (StatusCode::OK, Json(page)).into_response()
}

/// DELETE /v2/service_instances/{guid}
pub async fn delete_service_instance(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    let user_provided = state
        .get_service_instance(&id)
        .map(ServiceInstance::is_user_provided);
    if user_provided != Some(false) {
        return instance_not_found(&id);
    }

    if params.run_async {
        let job = state.start_job(Some(Deletion::ServiceInstance(id)));
        let body = job_resource(&job.id, JobStatusV2::Queued, None);
        return (StatusCode::ACCEPTED, Json(body)).into_response();
    }

    state.delete_service_instance(&id);
    StatusCode::NO_CONTENT.into_response()
}

/// DELETE /v2/user_provided_service_instances/{guid}
pub async fn delete_user_provided_service_instance(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.write().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    let user_provided = state
        .get_service_instance(&id)
        .map(ServiceInstance::is_user_provided);
    if user_provided != Some(true) {
        return instance_not_found(&id);
    }

    state.delete_service_instance(&id);
    StatusCode::NO_CONTENT.into_response()
}
