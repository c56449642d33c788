//! Organization endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{check_auth, paginate, ListParams};
use crate::mock_server::state::MockState;
use crate::{
    Metadata, Organization, OrganizationEntity, Resource, SpaceQuota, SpaceQuotaDefinitionEntity,
};

/// Render an organization as a v2 resource.
pub fn organization_resource(organization: &Organization) -> Resource<OrganizationEntity> {
    Resource {
        metadata: Metadata {
            guid: organization.id.clone(),
            url: Some(format!("/v2/organizations/{}", organization.id)),
            created_at: organization.created_at,
            updated_at: None,
        },
        entity: OrganizationEntity {
            name: organization.name.clone(),
            status: organization.status.clone(),
            quota_definition_guid: organization.quota_definition_id.clone(),
            billing_enabled: false,
        },
    }
}

/// Render a space quota as a v2 resource.
pub fn space_quota_resource(quota: &SpaceQuota) -> Resource<SpaceQuotaDefinitionEntity> {
    Resource {
        metadata: Metadata {
            guid: quota.id.clone(),
            url: Some(format!("/v2/space_quota_definitions/{}", quota.id)),
            created_at: None,
            updated_at: None,
        },
        entity: SpaceQuotaDefinitionEntity {
            name: quota.name.clone(),
            organization_guid: quota.organization_id.clone(),
            non_basic_services_allowed: quota.paid_service_plans,
            total_services: quota.total_services,
            total_routes: quota.total_routes,
            memory_limit: quota.total_memory_limit,
            instance_memory_limit: quota.instance_memory_limit,
            app_instance_limit: quota.app_instance_limit,
        },
    }
}

/// GET /v2/organizations
pub async fn list_organizations(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let state = state.read().await;
    if let Err(rejection) = check_auth(&state, &headers) {
        return rejection;
    }

    let params = ListParams::from_pairs(&pairs);
    let organizations = state.list_organizations(params.name.as_deref());
    let page = paginate(
        &organizations,
        &params,
        "/v2/organizations",
        organization_resource,
    );

    (StatusCode::OK, Json(page)).into_response()
}

/// GET /v2/organizations/{guid}/space_quota_definitions
pub async fn list_space_quotas(
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
    let quotas = state.list_space_quotas(&organization_id);
    let path = format!("/v2/organizations/{organization_id}/space_quota_definitions");
    let page = paginate(&quotas, &params, &path, space_quota_resource);

    (StatusCode::OK, Json(page)).into_response()
}
