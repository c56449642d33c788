//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{TimeZone, Utc};

use crate::{Organization, ServiceInstance, ServiceInstanceType, Space, SpaceQuota};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    pub fn organization(id: &str, name: &str) -> Organization {
        Organization {
            id: id.to_string(),
            name: name.to_string(),
            status: Some("active".to_string()),
            quota_definition_id: Some("default-quota".to_string()),
            created_at: Utc.with_ymd_and_hms(2016, 6, 8, 16, 41, 33).single(),
        }
    }

    pub fn space(id: &str, name: &str, organization_id: &str) -> Space {
        Space {
            id: id.to_string(),
            name: name.to_string(),
            organization_id: Some(organization_id.to_string()),
            space_quota_id: None,
            allow_ssh: true,
            created_at: None,
        }
    }

    pub fn space_quota(id: &str, name: &str, organization_id: &str) -> SpaceQuota {
        SpaceQuota {
            id: id.to_string(),
            name: name.to_string(),
            organization_id: Some(organization_id.to_string()),
            paid_service_plans: false,
            total_services: 10,
            total_routes: 20,
            total_memory_limit: 2048,
            instance_memory_limit: -1,
            app_instance_limit: Some(-1),
        }
    }

    pub fn managed_instance(id: &str, name: &str, space_id: &str) -> ServiceInstance {
        ServiceInstance {
            id: id.to_string(),
            name: name.to_string(),
            instance_type: ServiceInstanceType::Managed,
            space_id: Some(space_id.to_string()),
            dashboard_url: None,
            last_operation: None,
        }
    }

    pub fn user_provided_instance(id: &str, name: &str, space_id: &str) -> ServiceInstance {
        ServiceInstance {
            instance_type: ServiceInstanceType::UserProvided,
            ..Self::managed_instance(id, name, space_id)
        }
    }

    /// A small platform with two organizations.
    ///
    /// - `test-org` (`org-1`): spaces `dev` and `prod`, space quotas `small`
    ///   and `large`. `dev` holds `my-db` (managed) and `my-creds` (user
    ///   provided); `prod` holds two instances both named `cache`.
    /// - `other-org` (`org-2`): a space also named `dev`.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            organizations: vec![
                Self::organization("org-1", "test-org"),
                Self::organization("org-2", "other-org"),
            ],
            spaces: vec![
                Self::space("space-1", "dev", "org-1"),
                Self::space("space-2", "prod", "org-1"),
                Self::space("space-3", "dev", "org-2"),
            ],
            space_quotas: vec![
                Self::space_quota("quota-1", "small", "org-1"),
                Self::space_quota("quota-2", "large", "org-1"),
            ],
            service_instances: vec![
                Self::managed_instance("si-1", "my-db", "space-1"),
                Self::user_provided_instance("si-2", "my-creds", "space-1"),
                Self::managed_instance("si-3", "cache", "space-2"),
                Self::managed_instance("si-4", "cache", "space-2"),
            ],
        }
    }
}

/// Data for the default mock server.
#[derive(Debug, Clone)]
pub struct DefaultScenario {
    pub organizations: Vec<Organization>,
    pub spaces: Vec<Space>,
    pub space_quotas: Vec<SpaceQuota>,
    pub service_instances: Vec<ServiceInstance>,
}
