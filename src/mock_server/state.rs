//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Cloud Foundry API server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{JobErrorDetails, JobStatusV2, Organization, ServiceInstance, Space, SpaceQuota};

/// States a new job walks through when no script is configured.
pub const DEFAULT_JOB_SCRIPT: [JobStatusV2; 3] = [
    JobStatusV2::Queued,
    JobStatusV2::Running,
    JobStatusV2::Finished,
];

/// What a job does once it finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    ServiceInstance(String),
    Space(String),
}

/// A platform job that advances one state per status request.
#[derive(Debug, Clone)]
pub struct MockJob {
    pub id: String,
    pub script: Vec<JobStatusV2>,
    pub polls: usize,
    pub failure: Option<JobErrorDetails>,
    pub deletion: Option<Deletion>,
}

impl MockJob {
    /// The state reported by the next status request. The last scripted
    /// state repeats.
    fn advance(&mut self) -> JobStatusV2 {
        let index = self.polls.min(self.script.len().saturating_sub(1));
        self.polls += 1;
        self.script
            .get(index)
            .copied()
            .unwrap_or(JobStatusV2::Finished)
    }
}

/// Shared state for the mock server.
///
/// Collections are kept in insertion order so listings page
/// deterministically. The whole state is wrapped in `Arc<RwLock<_>>` for
/// concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    pub organizations: Vec<Organization>,
    pub spaces: Vec<Space>,
    pub space_quotas: Vec<SpaceQuota>,
    pub service_instances: Vec<ServiceInstance>,

    /// Jobs indexed by GUID.
    pub jobs: HashMap<String, MockJob>,

    /// States for jobs created from now on. Empty means [`DEFAULT_JOB_SCRIPT`].
    pub job_script: Vec<JobStatusV2>,

    /// Error attached to jobs created from now on.
    pub job_failure: Option<JobErrorDetails>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    next_job: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organizations.push(organization);
        self
    }

    pub fn with_space(mut self, space: Space) -> Self {
        self.spaces.push(space);
        self
    }

    pub fn with_space_quota(mut self, quota: SpaceQuota) -> Self {
        self.space_quotas.push(quota);
        self
    }

    pub fn with_service_instance(mut self, instance: ServiceInstance) -> Self {
        self.service_instances.push(instance);
        self
    }

    /// Script the states of jobs created from now on.
    pub fn with_job_script(mut self, script: Vec<JobStatusV2>) -> Self {
        self.job_script = script;
        self
    }

    /// Make jobs created from now on fail with `details`.
    pub fn with_job_failure(mut self, details: JobErrorDetails) -> Self {
        self.job_script = vec![JobStatusV2::Queued, JobStatusV2::Failed];
        self.job_failure = Some(details);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Organizations, optionally filtered by exact name.
    pub fn list_organizations(&self, name: Option<&str>) -> Vec<&Organization> {
        self.organizations
            .iter()
            .filter(|o| name.map_or(true, |n| o.name == n))
            .collect()
    }

    /// Spaces of an organization, optionally filtered by exact name.
    pub fn list_spaces(&self, organization_id: &str, name: Option<&str>) -> Vec<&Space> {
        self.spaces
            .iter()
            .filter(|s| s.organization_id.as_deref() == Some(organization_id))
            .filter(|s| name.map_or(true, |n| s.name == n))
            .collect()
    }

    /// Space quotas of an organization.
    pub fn list_space_quotas(&self, organization_id: &str) -> Vec<&SpaceQuota> {
        self.space_quotas
            .iter()
            .filter(|q| q.organization_id.as_deref() == Some(organization_id))
            .collect()
    }

    /// Service instances of a space, optionally filtered by exact name.
    pub fn list_service_instances(
        &self,
        space_id: &str,
        name: Option<&str>,
    ) -> Vec<&ServiceInstance> {
        self.service_instances
            .iter()
            .filter(|i| i.space_id.as_deref() == Some(space_id))
            .filter(|i| name.map_or(true, |n| i.name == n))
            .collect()
    }

    pub fn get_space(&self, id: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    pub fn get_service_instance(&self, id: &str) -> Option<&ServiceInstance> {
        self.service_instances.iter().find(|i| i.id == id)
    }

    /// Create a job that performs `deletion` once it finishes.
    pub fn start_job(&mut self, deletion: Option<Deletion>) -> &MockJob {
        self.next_job += 1;
        let id = format!("job-{}", self.next_job);
        let script = if self.job_script.is_empty() {
            DEFAULT_JOB_SCRIPT.to_vec()
        } else {
            self.job_script.clone()
        };
        let job = MockJob {
            id: id.clone(),
            script,
            polls: 0,
            failure: self.job_failure.clone(),
            deletion,
        };
        self.jobs.entry(id).or_insert(job)
    }

    /// Report the job's next state, applying its deletion once it finishes.
    pub fn poll_job(&mut self, id: &str) -> Option<(JobStatusV2, Option<JobErrorDetails>)> {
        let job = self.jobs.get_mut(id)?;
        let status = job.advance();
        let failure = match status {
            JobStatusV2::Failed => job.failure.clone(),
            _ => None,
        };
        let deletion = match status {
            JobStatusV2::Finished => job.deletion.take(),
            _ => None,
        };

        match deletion {
            Some(Deletion::ServiceInstance(id)) => {
                self.delete_service_instance(&id);
            }
            Some(Deletion::Space(id)) => {
                self.delete_space(&id);
            }
            None => {}
        }

        Some((status, failure))
    }

    /// Remove a service instance. Returns false if it did not exist.
    pub fn delete_service_instance(&mut self, id: &str) -> bool {
        let before = self.service_instances.len();
        self.service_instances.retain(|i| i.id != id);
        self.service_instances.len() != before
    }

    /// Remove a space and every service instance in it.
    pub fn delete_space(&mut self, id: &str) -> bool {
        let before = self.spaces.len();
        self.spaces.retain(|s| s.id != id);
        self.service_instances
            .retain(|i| i.space_id.as_deref() != Some(id));
        self.spaces.len() != before
    }
}
