//! Name-based operations against a targeted organization and space.

use std::future::Future;

use futures::{future, stream, TryStreamExt};

use crate::client::CfClient;
use crate::error::{CfError, Result};
use crate::job::PollConfig;
use crate::models::{Organization, ServiceInstance, Space, SpaceQuota};
use crate::operations::composer::{
    act_then_await_with, resolve_by_name, Completed, MutationResponse,
};
use crate::operations::tracker::{OperationTracker, Phase};
use crate::query::ListQuery;
use crate::traits::{Delete, List, ListStream};

/// High-level operations addressed by resource name.
///
/// Organization and space names are resolved to GUIDs on every call, so a
/// renamed or recreated target is picked up without rebuilding.
///
/// # Example
///
/// ```no_run
/// use cfops::{CfClient, CloudFoundryOperations};
///
/// # async fn example() -> cfops::Result<()> {
/// let operations = CloudFoundryOperations::builder(CfClient::from_env()?)
///     .organization("my-org")
///     .space("dev")
///     .build();
///
/// operations.delete_service_instance("my-db").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CloudFoundryOperations {
    client: CfClient,
    organization: Option<String>,
    space: Option<String>,
    poll_config: PollConfig,
}

/// Builder for [`CloudFoundryOperations`].
#[derive(Debug, Clone)]
pub struct CloudFoundryOperationsBuilder {
    client: CfClient,
    organization: Option<String>,
    space: Option<String>,
    poll_config: PollConfig,
}

impl CloudFoundryOperationsBuilder {
    /// Target an organization by name.
    #[must_use]
    pub fn organization(mut self, name: impl Into<String>) -> Self {
        self.organization = Some(name.into());
        self
    }

    /// Target a space by name, within the targeted organization.
    #[must_use]
    pub fn space(mut self, name: impl Into<String>) -> Self {
        self.space = Some(name.into());
        self
    }

    /// How to wait for jobs started by mutations.
    #[must_use]
    pub fn poll_config(mut self, config: PollConfig) -> Self {
        self.poll_config = config;
        self
    }

    pub fn build(self) -> CloudFoundryOperations {
        CloudFoundryOperations {
            client: self.client,
            organization: self.organization,
            space: self.space,
            poll_config: self.poll_config,
        }
    }
}

impl CloudFoundryOperations {
    pub fn builder(client: CfClient) -> CloudFoundryOperationsBuilder {
        CloudFoundryOperationsBuilder {
            client,
            organization: None,
            space: None,
            poll_config: PollConfig::default(),
        }
    }

    pub fn client(&self) -> &CfClient {
        &self.client
    }

    /// Resolve the targeted organization to its GUID.
    ///
    /// # Errors
    ///
    /// [`CfError::ConfigMissing`] when no organization is targeted, otherwise
    /// any lookup error.
    pub async fn organization_id(&self) -> Result<String> {
        let name = self
            .organization
            .as_deref()
            .ok_or_else(|| CfError::ConfigMissing("no organization targeted".to_string()))?;
        let organization = self.find_organization(name).await?;
        Ok(organization.id)
    }

    /// Resolve the targeted space to its GUID.
    ///
    /// # Errors
    ///
    /// [`CfError::ConfigMissing`] when no space is targeted, otherwise any
    /// lookup error.
    pub async fn space_id(&self) -> Result<String> {
        let name = self
            .space
            .as_deref()
            .ok_or_else(|| CfError::ConfigMissing("no space targeted".to_string()))?;
        let space = self.find_space(name).await?;
        Ok(space.id)
    }

    /// All organizations visible to the caller.
    pub fn organizations(&self) -> ListStream<'static, Organization> {
        Organization::stream(self.client.clone(), (), ListQuery::new())
    }

    /// Look up one organization by name.
    ///
    /// # Errors
    ///
    /// [`CfError::NotFound`] or [`CfError::Ambiguous`] when the name does not
    /// identify exactly one organization.
    pub async fn get_organization(&self, name: &str) -> Result<Organization> {
        let mut tracker = OperationTracker::new("get-organization");
        tracker.advance(Phase::Resolving)?;
        let organization = tracker.track(self.find_organization(name).await)?;
        tracker.advance(Phase::Completed)?;
        Ok(organization)
    }

    /// All spaces of the targeted organization.
    pub fn spaces(&self) -> ListStream<'static, Space> {
        self.in_organization(ListQuery::new())
    }

    /// Look up one space of the targeted organization by name.
    ///
    /// # Errors
    ///
    /// Lookup errors for the organization or the space.
    pub async fn get_space(&self, name: &str) -> Result<Space> {
        let mut tracker = OperationTracker::new("get-space");
        tracker.advance(Phase::Resolving)?;
        let space = tracker.track(self.find_space(name).await)?;
        tracker.advance(Phase::Completed)?;
        Ok(space)
    }

    /// All space quotas of the targeted organization.
    pub fn space_quotas(&self) -> ListStream<'static, SpaceQuota> {
        self.in_organization(ListQuery::new())
    }

    /// Look up one space quota of the targeted organization by name.
    ///
    /// # Errors
    ///
    /// Lookup errors for the organization or the quota.
    pub async fn get_space_quota(&self, name: &str) -> Result<SpaceQuota> {
        let mut tracker = OperationTracker::new("get-space-quota");
        tracker.advance(Phase::Resolving)?;
        let wanted = name.to_string();
        let quotas = self
            .space_quotas()
            .try_filter(move |quota| future::ready(quota.name == wanted));
        let quota = tracker.track(resolve_by_name("Space Quota", name, quotas).await)?;
        tracker.advance(Phase::Completed)?;
        Ok(quota)
    }

    /// Delete a service instance of the targeted space and wait for the
    /// platform to finish.
    ///
    /// # Errors
    ///
    /// Lookup errors, the rejected request, or job failure and timeout.
    pub async fn delete_service_instance(&self, name: &str) -> Result<Completed<()>> {
        let mut tracker = OperationTracker::new("delete-service-instance");
        tracker.advance(Phase::Resolving)?;
        let space_id = tracker.track(self.space_id().await)?;
        let instances = ServiceInstance::stream(
            self.client.clone(),
            space_id,
            ListQuery::new().name(name),
        );
        let instance =
            tracker.track(resolve_by_name("Service instance", name, instances).await)?;

        self.mutate(&mut tracker, instance.delete(&self.client)).await
    }

    /// Delete a space of the targeted organization, including its contents.
    ///
    /// # Errors
    ///
    /// Lookup errors, the rejected request, or job failure and timeout.
    pub async fn delete_space(&self, name: &str) -> Result<Completed<()>> {
        let mut tracker = OperationTracker::new("delete-space");
        tracker.advance(Phase::Resolving)?;
        let space = tracker.track(self.find_space(name).await)?;

        self.mutate(&mut tracker, space.delete(&self.client)).await
    }

    async fn find_organization(&self, name: &str) -> Result<Organization> {
        let organizations =
            Organization::stream(self.client.clone(), (), ListQuery::new().name(name));
        resolve_by_name("Organization", name, organizations).await
    }

    async fn find_space(&self, name: &str) -> Result<Space> {
        let organization_id = self.organization_id().await?;
        let spaces = Space::stream(
            self.client.clone(),
            organization_id,
            ListQuery::new().name(name),
        );
        resolve_by_name("Space", name, spaces).await
    }

    /// Stream `T` under the targeted organization. The organization is
    /// resolved when the stream is first polled.
    fn in_organization<T>(&self, query: ListQuery) -> ListStream<'static, T>
    where
        T: List<Scope = String>,
    {
        let operations = self.clone();
        let client = self.client.clone();
        let organization_id = async move { operations.organization_id().await };

        Box::pin(
            stream::once(organization_id)
                .map_ok(move |id| T::stream(client.clone(), id, query.clone()))
                .try_flatten(),
        )
    }

    async fn mutate<T, M>(
        &self,
        tracker: &mut OperationTracker,
        mutation: M,
    ) -> Result<Completed<T>>
    where
        M: Future<Output = Result<MutationResponse<T>>>,
    {
        tracker.advance(Phase::Mutating)?;
        let result = act_then_await_with(mutation, &self.client, &self.poll_config, |_| {
            tracker.advance(Phase::AwaitingJob)
        })
        .await;

        let completed = tracker.track(result)?;
        tracker.advance(Phase::Completed)?;
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use futures::StreamExt;

    fn operations() -> CloudFoundryOperations {
        let client = CfClient::new("token", "http://127.0.0.1:9").unwrap();
        CloudFoundryOperations::builder(client).build()
    }

    #[tokio::test]
    async fn test_organization_id_requires_target() {
        let err = operations().organization_id().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_space_id_requires_target() {
        let err = operations().space_id().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[tokio::test]
    async fn test_spaces_stream_reports_missing_organization() {
        let results: Vec<Result<Space>> = operations().spaces().collect().await;
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(CfError::ConfigMissing(_))));
    }
}
