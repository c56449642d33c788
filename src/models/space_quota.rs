//! Space quota definitions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::CfClient;
use crate::error::Result;
use crate::models::resource::{Named, PaginatedResponse, Resource};
use crate::pagination::Page;
use crate::query::ListQuery;
use crate::traits::List;

/// Space quota definition entity.
///
/// Memory limits are in megabytes. `-1` means unlimited for the instance
/// memory and app instance limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceQuotaDefinitionEntity {
    pub name: String,
    #[serde(default)]
    pub organization_guid: Option<String>,
    #[serde(default)]
    pub non_basic_services_allowed: bool,
    #[serde(default)]
    pub total_services: i64,
    #[serde(default)]
    pub total_routes: i64,
    #[serde(default)]
    pub memory_limit: i64,
    #[serde(default)]
    pub instance_memory_limit: i64,
    #[serde(default)]
    pub app_instance_limit: Option<i64>,
}

/// A space quota of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceQuota {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub paid_service_plans: bool,
    pub total_services: i64,
    pub total_routes: i64,
    pub total_memory_limit: i64,
    pub instance_memory_limit: i64,
    #[serde(default)]
    pub app_instance_limit: Option<i64>,
}

impl From<Resource<SpaceQuotaDefinitionEntity>> for SpaceQuota {
    fn from(resource: Resource<SpaceQuotaDefinitionEntity>) -> Self {
        let entity = resource.entity;
        Self {
            id: resource.metadata.guid,
            name: entity.name,
            organization_id: entity.organization_guid,
            paid_service_plans: entity.non_basic_services_allowed,
            total_services: entity.total_services,
            total_routes: entity.total_routes,
            total_memory_limit: entity.memory_limit,
            instance_memory_limit: entity.instance_memory_limit,
            app_instance_limit: entity.app_instance_limit,
        }
    }
}

impl Named for SpaceQuota {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Listed per organization. The endpoint has no name filter, so lookups by
/// name happen client-side.
#[async_trait]
impl List for SpaceQuota {
    type Scope = String;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &CfClient,
        organization_id: &String,
        query: &ListQuery,
        page: u32,
    ) -> Result<Page<Self>> {
        let path = format!(
            "v2/organizations/{}/space_quota_definitions",
            urlencoding::encode(organization_id)
        );
        let response = client.get_with_query(&path, &query.pairs(page)).await?;
        let data: PaginatedResponse<Resource<SpaceQuotaDefinitionEntity>> =
            response.json().await?;

        Ok(data.into_page(page).map(SpaceQuota::from))
    }
}
