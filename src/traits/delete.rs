//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::CfClient;
use crate::error::Result;
use crate::operations::MutationResponse;

/// Delete an entity.
///
/// The platform either deletes right away or accepts the request and hands
/// back a job. Pass the result to [`act_then_await`](crate::act_then_await)
/// to wait for the job.
#[async_trait]
pub trait Delete: Sync {
    /// Issue the delete request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    async fn delete(&self, client: &CfClient) -> Result<MutationResponse<()>>;
}
