//! Waiting for asynchronous platform jobs.
//!
//! Mutations such as deleting a service instance may be accepted by the
//! platform with a job instead of completing immediately. [`await_job`]
//! polls the job status until it finishes, fails, or the configured timeout
//! elapses.
//!
//! Polling is timer driven: between polls the future is parked on
//! `tokio::time::sleep`. Dropping the future cancels the wait and no further
//! status request is made.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::error::{CfError, Result};

/// Poll interval used when neither the caller nor the platform suggests one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// A job accepted by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// The job GUID.
    pub id: String,
    /// Poll interval suggested by the platform, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_hint: Option<Duration>,
}

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            poll_interval_hint: None,
        }
    }

    #[must_use]
    pub fn with_poll_interval_hint(mut self, interval: Duration) -> Self {
        self.poll_interval_hint = Some(interval);
        self
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Queued,
    Running,
    Finished,
    Failed,
}

impl JobState {
    /// Whether the job will not change state any more.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }
}

/// Error attached to a failed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobError {
    pub code: String,
    pub description: String,
}

/// A snapshot of a job's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    #[serde(default)]
    pub error: Option<JobError>,
}

impl JobStatus {
    #[must_use]
    pub fn new(state: JobState) -> Self {
        Self { state, error: None }
    }

    #[must_use]
    pub fn failed(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            state: JobState::Failed,
            error: Some(JobError {
                code: code.into(),
                description: description.into(),
            }),
        }
    }

    fn into_failure(self, job_id: &str) -> CfError {
        let (code, description) = match self.error {
            Some(error) => (error.code, error.description),
            None => ("UnknownError".to_string(), "job failed".to_string()),
        };
        CfError::JobFailed {
            job_id: job_id.to_string(),
            code,
            description,
        }
    }
}

/// How the delay between polls evolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// The same interval before every poll.
    #[default]
    Fixed,
    /// Double the interval after every poll, up to `max`.
    Exponential { max: Duration },
}

impl Backoff {
    /// The delay to use after a poll that waited `current`.
    #[must_use]
    pub fn next_delay(&self, current: Duration) -> Duration {
        match self {
            Self::Fixed => current,
            Self::Exponential { max } => current.saturating_mul(2).min(*max),
        }
    }
}

/// Polling configuration for [`await_job`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between status checks. Falls back to the job's hint, then to
    /// [`DEFAULT_POLL_INTERVAL`].
    pub poll_interval: Option<Duration>,
    /// Maximum total wait. `None` waits until the job is terminal.
    pub timeout: Option<Duration>,
    pub backoff: Backoff,
}

impl PollConfig {
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    fn initial_interval(&self, handle: &JobHandle) -> Duration {
        self.poll_interval
            .or(handle.poll_interval_hint)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }
}

/// Source of job status snapshots.
#[async_trait]
pub trait JobStatusFetcher: Send + Sync {
    /// Fetch the current status of a job.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn get_status(&self, job_id: &str) -> Result<JobStatus>;
}

/// Wait for a job to reach a terminal state.
///
/// # Errors
///
/// - [`CfError::JobFailed`] when the job fails.
/// - [`CfError::Timeout`] when `config.timeout` elapses first, including
///   while a status request is still in flight.
/// - Any error from the status fetcher, unchanged.
#[tracing::instrument(skip(fetcher, handle, config), fields(job_id = %handle.id))]
pub async fn await_job<F>(fetcher: &F, handle: &JobHandle, config: &PollConfig) -> Result<()>
where
    F: JobStatusFetcher + ?Sized,
{
    let started = Instant::now();
    let deadline = config.timeout.map(|timeout| started + timeout);
    let mut delay = config.initial_interval(handle);
    let mut polls: u32 = 0;

    let timed_out = |polls: u32| {
        tracing::warn!(polls, "job did not complete in time");
        CfError::Timeout {
            job_id: handle.id.clone(),
            elapsed: started.elapsed(),
        }
    };

    loop {
        let request = fetcher.get_status(&handle.id);
        let status = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, request).await {
                Ok(status) => status?,
                Err(_) => return Err(timed_out(polls)),
            },
            None => request.await?,
        };
        polls += 1;
        tracing::debug!(state = ?status.state, polls, "polled job");

        match status.state {
            JobState::Finished => return Ok(()),
            JobState::Failed => return Err(status.into_failure(&handle.id)),
            JobState::Queued | JobState::Running => {}
        }

        if let Some(deadline) = deadline {
            // A poll due exactly at the deadline still runs.
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || remaining < delay {
                tokio::time::sleep(remaining).await;
                return Err(timed_out(polls));
            }
        }

        tokio::time::sleep(delay).await;
        delay = config.backoff.next_delay(delay);
    }
}
