//! Organization model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::CfClient;
use crate::error::Result;
use crate::models::resource::{Named, PaginatedResponse, Resource};
use crate::pagination::Page;
use crate::query::ListQuery;
use crate::traits::List;

/// Organization entity as returned by `/v2/organizations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationEntity {
    pub name: String,

    /// Lifecycle status (e.g., "active", "suspended").
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub quota_definition_guid: Option<String>,

    #[serde(default)]
    pub billing_enabled: bool,
}

/// A Cloud Foundry organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub quota_definition_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Resource<OrganizationEntity>> for Organization {
    fn from(resource: Resource<OrganizationEntity>) -> Self {
        Self {
            id: resource.metadata.guid,
            name: resource.entity.name,
            status: resource.entity.status,
            quota_definition_id: resource.entity.quota_definition_guid,
            created_at: resource.metadata.created_at,
        }
    }
}

impl Named for Organization {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl List for Organization {
    type Scope = ();

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &CfClient,
        _scope: &(),
        query: &ListQuery,
        page: u32,
    ) -> Result<Page<Self>> {
        let response = client
            .get_with_query("v2/organizations", &query.pairs(page))
            .await?;
        let data: PaginatedResponse<Resource<OrganizationEntity>> = response.json().await?;

        Ok(data.into_page(page).map(Organization::from))
    }
}
