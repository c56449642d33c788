//! List trait for fetching collections of entities.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::client::CfClient;
use crate::error::Result;
use crate::pagination::{aggregate, collect_all, Page};
use crate::query::ListQuery;

/// A boxed, sendable stream of listed entities.
pub type ListStream<'a, T> = Pin<Box<dyn Stream<Item = Result<T>> + Send + 'a>>;

/// List/filter entities with pagination support.
///
/// Implement this trait for entity types that can be listed. `Scope` is
/// the parent the listing runs under: `()` for top-level collections, the
/// parent GUID for nested ones.
///
/// # Example
///
/// ```ignore
/// use cfops::{CfClient, ListQuery, Organization, List};
///
/// let client = CfClient::from_env()?;
///
/// // Fetch a single page
/// let page = Organization::list_page(&client, &(), &ListQuery::new(), 1).await?;
///
/// // Fetch all pages
/// let all = Organization::list_all(&client, &(), &ListQuery::new()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send + 'static {
    /// The parent the listing is scoped to.
    type Scope: Clone + Send + Sync + std::fmt::Debug + 'static;

    /// List entities matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The Cloud Foundry API client
    /// * `scope` - The parent to list under
    /// * `query` - Filters, page size and ordering
    /// * `page` - Page number (1-indexed)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &CfClient,
        scope: &Self::Scope,
        query: &ListQuery,
        page: u32,
    ) -> Result<Page<Self>>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns the first page error. No partial result is returned.
    async fn list_all(
        client: &CfClient,
        scope: &Self::Scope,
        query: &ListQuery,
    ) -> Result<Vec<Self>> {
        collect_all(|page| Self::list_page(client, scope, query, page)).await
    }

    /// Stream all entities matching the query, one page at a time.
    ///
    /// The stream owns its inputs, so it can outlive the caller's borrows.
    fn stream(client: CfClient, scope: Self::Scope, query: ListQuery) -> ListStream<'static, Self> {
        Box::pin(aggregate(move |page| {
            let client = client.clone();
            let scope = scope.clone();
            let query = query.clone();
            async move { Self::list_page(&client, &scope, &query, page).await }
        }))
    }
}
