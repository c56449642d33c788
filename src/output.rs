//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Completed, Organization, Space, SpaceQuota};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, name: &str) -> Vec<String> {
    let title = format!("{kind}: {name}");
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn limit(value: i64, unit: &str) -> String {
    if value < 0 {
        "unlimited".to_string()
    } else {
        format!("{value}{unit}")
    }
}

impl PrettyPrint for Organization {
    fn pretty_print(&self) -> String {
        let mut lines = header("Organization", &self.name);
        lines.push(format!("GUID:           {}", self.id));

        if let Some(ref status) = self.status {
            lines.push(format!("Status:         {}", status));
        }

        if let Some(ref quota) = self.quota_definition_id {
            lines.push(format!("Quota:          {}", quota));
        }

        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Space {
    fn pretty_print(&self) -> String {
        let mut lines = header("Space", &self.name);
        lines.push(format!("GUID:           {}", self.id));

        if let Some(ref org) = self.organization_id {
            lines.push(format!("Organization:   {}", org));
        }

        if let Some(ref quota) = self.space_quota_id {
            lines.push(format!("Space Quota:    {}", quota));
        }

        lines.push(format!(
            "SSH:            {}",
            if self.allow_ssh { "enabled" } else { "disabled" }
        ));

        lines.join("\n")
    }
}

impl PrettyPrint for SpaceQuota {
    fn pretty_print(&self) -> String {
        let mut lines = header("Space Quota", &self.name);
        lines.push(format!("GUID:           {}", self.id));
        lines.push(format!("Total Memory:   {}", limit(self.total_memory_limit, "M")));
        lines.push(format!("Instance Mem:   {}", limit(self.instance_memory_limit, "M")));
        lines.push(format!("Routes:         {}", limit(self.total_routes, "")));
        lines.push(format!("Services:       {}", limit(self.total_services, "")));

        if let Some(instances) = self.app_instance_limit {
            lines.push(format!("App Instances:  {}", limit(instances, "")));
        }

        lines.push(format!(
            "Paid Plans:     {}",
            if self.paid_service_plans { "allowed" } else { "disallowed" }
        ));

        lines.join("\n")
    }
}

impl PrettyPrint for Completed<()> {
    fn pretty_print(&self) -> String {
        match self.job() {
            Some(job) => format!("OK (job {})", job.id),
            None => "OK".to_string(),
        }
    }
}
