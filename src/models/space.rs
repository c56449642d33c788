//! Space model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::CfClient;
use crate::error::Result;
use crate::models::resource::{Named, PaginatedResponse, Resource};
use crate::operations::MutationResponse;
use crate::pagination::Page;
use crate::query::ListQuery;
use crate::traits::{Delete, List};

/// Space entity as returned by `/v2/organizations/{guid}/spaces`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceEntity {
    pub name: String,

    #[serde(default)]
    pub organization_guid: Option<String>,

    #[serde(default)]
    pub space_quota_definition_guid: Option<String>,

    #[serde(default)]
    pub allow_ssh: bool,
}

/// A space within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub space_quota_id: Option<String>,
    #[serde(default)]
    pub allow_ssh: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Resource<SpaceEntity>> for Space {
    fn from(resource: Resource<SpaceEntity>) -> Self {
        Self {
            id: resource.metadata.guid,
            name: resource.entity.name,
            organization_id: resource.entity.organization_guid,
            space_quota_id: resource.entity.space_quota_definition_guid,
            allow_ssh: resource.entity.allow_ssh,
            created_at: resource.metadata.created_at,
        }
    }
}

impl Named for Space {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Spaces are listed per organization; the scope is the organization GUID.
#[async_trait]
impl List for Space {
    type Scope = String;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &CfClient,
        organization_id: &String,
        query: &ListQuery,
        page: u32,
    ) -> Result<Page<Self>> {
        let path = format!(
            "v2/organizations/{}/spaces",
            urlencoding::encode(organization_id)
        );
        let response = client.get_with_query(&path, &query.pairs(page)).await?;
        let data: PaginatedResponse<Resource<SpaceEntity>> = response.json().await?;

        Ok(data.into_page(page).map(Space::from))
    }
}

/// Deleting a space removes everything inside it and runs as a job.
#[async_trait]
impl Delete for Space {
    #[tracing::instrument(skip(self, client), fields(space_id = %self.id))]
    async fn delete(&self, client: &CfClient) -> Result<MutationResponse<()>> {
        let path = format!("v2/spaces/{}", urlencoding::encode(&self.id));
        client
            .delete_async(&path, &[("async", "true"), ("recursive", "true")])
            .await
    }
}
