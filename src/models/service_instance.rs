//! Service instance model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::CfClient;
use crate::error::Result;
use crate::models::resource::{Named, PaginatedResponse, Resource};
use crate::operations::MutationResponse;
use crate::pagination::Page;
use crate::query::ListQuery;
use crate::traits::{Delete, List};

/// Whether an instance is backed by a service broker or user provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceInstanceType {
    #[serde(rename = "managed_service_instance")]
    Managed,
    #[serde(rename = "user_provided_service_instance")]
    UserProvided,
}

impl std::fmt::Display for ServiceInstanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Managed => write!(f, "managed"),
            Self::UserProvided => write!(f, "user-provided"),
        }
    }
}

/// The last asynchronous operation run against an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastOperation {
    /// "create", "update" or "delete".
    #[serde(rename = "type")]
    pub operation_type: String,
    /// "in progress", "succeeded" or "failed".
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Service instance entity as returned by `/v2/spaces/{guid}/service_instances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstanceEntity {
    pub name: String,
    #[serde(rename = "type", default = "default_instance_type")]
    pub instance_type: ServiceInstanceType,
    #[serde(default)]
    pub space_guid: Option<String>,
    #[serde(default)]
    pub service_plan_guid: Option<String>,
    #[serde(default)]
    pub dashboard_url: Option<String>,
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
}

fn default_instance_type() -> ServiceInstanceType {
    ServiceInstanceType::Managed
}

/// A service instance in a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub instance_type: ServiceInstanceType,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub dashboard_url: Option<String>,
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
}

impl ServiceInstance {
    /// Whether the instance is user provided.
    pub fn is_user_provided(&self) -> bool {
        self.instance_type == ServiceInstanceType::UserProvided
    }
}

impl From<Resource<ServiceInstanceEntity>> for ServiceInstance {
    fn from(resource: Resource<ServiceInstanceEntity>) -> Self {
        let entity = resource.entity;
        Self {
            id: resource.metadata.guid,
            name: entity.name,
            instance_type: entity.instance_type,
            space_id: entity.space_guid,
            dashboard_url: entity.dashboard_url,
            last_operation: entity.last_operation,
        }
    }
}

impl Named for ServiceInstance {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Listed per space, including user-provided instances. The scope is the
/// space GUID.
#[async_trait]
impl List for ServiceInstance {
    type Scope = String;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &CfClient,
        space_id: &String,
        query: &ListQuery,
        page: u32,
    ) -> Result<Page<Self>> {
        let path = format!(
            "v2/spaces/{}/service_instances",
            urlencoding::encode(space_id)
        );
        let mut params = query.pairs(page);
        params.push((
            "return_user_provided_service_instances",
            "true".to_string(),
        ));

        let response = client.get_with_query(&path, &params).await?;
        let data: PaginatedResponse<Resource<ServiceInstanceEntity>> = response.json().await?;

        Ok(data.into_page(page).map(ServiceInstance::from))
    }
}

/// Managed instances are deleted through the broker and may answer with a
/// job. User-provided instances are deleted synchronously.
#[async_trait]
impl Delete for ServiceInstance {
    #[tracing::instrument(skip(self, client), fields(service_instance_id = %self.id))]
    async fn delete(&self, client: &CfClient) -> Result<MutationResponse<()>> {
        let id = urlencoding::encode(&self.id);
        match self.instance_type {
            ServiceInstanceType::Managed => {
                let path = format!("v2/service_instances/{id}");
                client.delete_async(&path, &[("async", "true")]).await
            }
            ServiceInstanceType::UserProvided => {
                let path = format!("v2/user_provided_service_instances/{id}");
                let no_params: [(&str, &str); 0] = [];
                client.delete_async(&path, &no_params).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_type_from_wire() {
        let resource: Resource<ServiceInstanceEntity> = serde_json::from_value(serde_json::json!({
            "metadata": { "guid": "si-1" },
            "entity": {
                "name": "my-db",
                "type": "user_provided_service_instance",
                "space_guid": "space-1"
            }
        }))
        .unwrap();

        let instance = ServiceInstance::from(resource);
        assert!(instance.is_user_provided());
        assert_eq!(instance.space_id.as_deref(), Some("space-1"));
        assert_eq!(instance.instance_type.to_string(), "user-provided");
    }

    #[test]
    fn test_missing_type_defaults_to_managed() {
        let entity: ServiceInstanceEntity =
            serde_json::from_value(serde_json::json!({ "name": "cache" })).unwrap();
        assert_eq!(entity.instance_type, ServiceInstanceType::Managed);
    }
}
