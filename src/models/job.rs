//! Wire formats of platform jobs.
//!
//! The v2 API reports jobs as resources with a lowercase `status`; the v3
//! API uses uppercase `state` values and a list of errors. Both are mapped
//! onto [`JobStatus`].

use serde::{Deserialize, Serialize};

use crate::job::{JobError, JobState, JobStatus};
use crate::models::resource::Resource;

/// v2 job status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatusV2 {
    Queued,
    Running,
    Finished,
    Failed,
}

/// Error details attached to a failed v2 job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobErrorDetails {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

/// v2 job entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntity {
    #[serde(default)]
    pub guid: Option<String>,
    pub status: JobStatusV2,
    #[serde(default)]
    pub error_details: Option<JobErrorDetails>,
}

/// A v2 job resource.
pub type JobResource = Resource<JobEntity>;

impl From<JobEntity> for JobStatus {
    fn from(entity: JobEntity) -> Self {
        let state = match entity.status {
            JobStatusV2::Queued => JobState::Queued,
            JobStatusV2::Running => JobState::Running,
            JobStatusV2::Finished => JobState::Finished,
            JobStatusV2::Failed => JobState::Failed,
        };
        let error = entity.error_details.map(|details| JobError {
            code: match (details.error_code, details.code) {
                (Some(error_code), Some(code)) => format!("{error_code}({code})"),
                (Some(error_code), None) => error_code,
                (None, Some(code)) => code.to_string(),
                (None, None) => "UnknownError".to_string(),
            },
            description: details
                .description
                .unwrap_or_else(|| "job failed".to_string()),
        });

        JobStatus { state, error }
    }
}

/// v3 job state values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStateV3 {
    Processing,
    Polling,
    Complete,
    Failed,
}

/// An entry of the v3 `errors` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorV3 {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// A v3 job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobV3 {
    pub guid: String,
    pub state: JobStateV3,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub errors: Vec<ApiErrorV3>,
}

impl From<JobV3> for JobStatus {
    fn from(job: JobV3) -> Self {
        let state = match job.state {
            JobStateV3::Processing | JobStateV3::Polling => JobState::Running,
            JobStateV3::Complete => JobState::Finished,
            JobStateV3::Failed => JobState::Failed,
        };
        let error = job.errors.into_iter().next().map(|error| JobError {
            code: match (error.title, error.code) {
                (Some(title), Some(code)) => format!("{title}({code})"),
                (Some(title), None) => title,
                (None, Some(code)) => code.to_string(),
                (None, None) => "UnknownError".to_string(),
            },
            description: error.detail.unwrap_or_else(|| "job failed".to_string()),
        });

        JobStatus { state, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_v2_failed_job() {
        let job: JobResource = serde_json::from_value(serde_json::json!({
            "metadata": { "guid": "job-1", "url": "/v2/jobs/job-1" },
            "entity": {
                "guid": "job-1",
                "status": "failed",
                "error_details": {
                    "code": 10001,
                    "description": "service broker rejected the request",
                    "error_code": "CF-ServiceBrokerBadResponse"
                }
            }
        }))
        .unwrap();

        let status = JobStatus::from(job.entity);
        assert_eq!(status.state, JobState::Failed);
        let error = status.error.unwrap();
        assert_eq!(error.code, "CF-ServiceBrokerBadResponse(10001)");
        assert_eq!(error.description, "service broker rejected the request");
    }

    #[test]
    fn test_v2_running_job_has_no_error() {
        let entity: JobEntity =
            serde_json::from_value(serde_json::json!({ "status": "running" })).unwrap();
        let status = JobStatus::from(entity);
        assert_eq!(status.state, JobState::Running);
        assert!(status.error.is_none());
    }

    #[test]
    fn test_v3_states() {
        for (wire, expected) in [
            ("PROCESSING", JobState::Running),
            ("POLLING", JobState::Running),
            ("COMPLETE", JobState::Finished),
        ] {
            let job: JobV3 =
                serde_json::from_value(serde_json::json!({ "guid": "j", "state": wire })).unwrap();
            assert_eq!(JobStatus::from(job).state, expected);
        }

        let failed: JobV3 = serde_json::from_value(serde_json::json!({
            "guid": "j",
            "state": "FAILED",
            "errors": [ { "code": 10008, "title": "CF-UnprocessableEntity", "detail": "something went wrong" } ]
        }))
        .unwrap();
        let status = JobStatus::from(failed);
        assert_eq!(status.state, JobState::Failed);
        assert_eq!(
            status.error.unwrap().code,
            "CF-UnprocessableEntity(10008)"
        );
    }
}
