//! Combinators that turn listings and mutations into single operations.

use std::future::Future;

use futures::{Stream, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{CfError, Result};
use crate::job::{await_job, JobHandle, JobStatusFetcher, PollConfig};

/// What the platform answered to a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationResponse<T> {
    /// The change is already applied.
    Immediate(T),
    /// The change runs as a job.
    Accepted(JobHandle),
}

/// The outcome of [`act_then_await`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completed<T> {
    /// The mutation completed synchronously with this value.
    Immediate(T),
    /// The mutation ran as this job, which finished.
    Job(JobHandle),
}

impl<T> Completed<T> {
    /// The synchronous result, if there was one.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Immediate(value) => Some(value),
            Self::Job(_) => None,
        }
    }

    /// The job that was awaited, if any.
    pub fn job(&self) -> Option<&JobHandle> {
        match self {
            Self::Immediate(_) => None,
            Self::Job(handle) => Some(handle),
        }
    }
}

/// Resolve a name to exactly one resource.
///
/// `items` should already be narrowed to resources carrying `name`. The
/// whole stream is consumed so that duplicates are always detected.
///
/// # Errors
///
/// - [`CfError::NotFound`] when the stream is empty.
/// - [`CfError::Ambiguous`] when it holds more than one item.
/// - The stream's own error, unchanged.
pub async fn resolve_by_name<T, S>(entity_type: &'static str, name: &str, items: S) -> Result<T>
where
    S: Stream<Item = Result<T>>,
{
    let mut items = std::pin::pin!(items);
    let mut first = None;
    let mut count = 0usize;

    while let Some(item) = items.try_next().await? {
        count += 1;
        if first.is_none() {
            first = Some(item);
        }
    }

    match first {
        None => Err(CfError::not_found(entity_type, name)),
        Some(item) if count == 1 => Ok(item),
        Some(_) => Err(CfError::Ambiguous {
            entity_type,
            name: name.to_string(),
            count,
        }),
    }
}

/// Run a mutation and, if the platform accepted it as a job, wait for the
/// job to finish.
///
/// The status fetcher is never called for immediate responses.
///
/// # Errors
///
/// Returns the mutation's error, or any error from [`await_job`].
pub async fn act_then_await<T, M, F>(
    mutation: M,
    fetcher: &F,
    config: &PollConfig,
) -> Result<Completed<T>>
where
    M: Future<Output = Result<MutationResponse<T>>>,
    F: JobStatusFetcher + ?Sized,
{
    act_then_await_with(mutation, fetcher, config, |_| Ok(())).await
}

/// [`act_then_await`] with a hook that runs once the mutation was accepted
/// as a job, before the first status request.
///
/// # Errors
///
/// Returns the mutation's error, the hook's error, or any error from
/// [`await_job`]. A failing hook skips polling.
pub async fn act_then_await_with<T, M, F, A>(
    mutation: M,
    fetcher: &F,
    config: &PollConfig,
    on_accepted: A,
) -> Result<Completed<T>>
where
    M: Future<Output = Result<MutationResponse<T>>>,
    F: JobStatusFetcher + ?Sized,
    A: FnOnce(&JobHandle) -> Result<()>,
{
    match mutation.await? {
        MutationResponse::Immediate(value) => Ok(Completed::Immediate(value)),
        MutationResponse::Accepted(handle) => {
            on_accepted(&handle)?;
            await_job(fetcher, &handle, config).await?;
            Ok(Completed::Job(handle))
        }
    }
}
