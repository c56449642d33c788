//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the cfops binary.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use crate::job::PollConfig;

/// Cloud Foundry operations command-line interface.
#[derive(Parser, Debug)]
#[command(name = "cfops", about = "Cloud Foundry operations CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Organization to target.
    #[arg(long, global = true, env = "CF_ORGANIZATION")]
    pub org: Option<String>,

    /// Space to target, within the organization.
    #[arg(long, global = true, env = "CF_SPACE")]
    pub space: Option<String>,

    /// Milliseconds between job status checks.
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Give up waiting for a job after this many seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Job polling settings from the command-line flags.
    pub fn poll_config(&self) -> PollConfig {
        let mut config = PollConfig::default();
        if let Some(ms) = self.poll_interval_ms {
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every entity of a type, across all pages.
    List {
        /// The type of entity to list.
        entity: Entity,
    },

    /// Get a single entity by name.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity name.
        name: String,
    },

    /// Delete an entity by name and wait for the platform to finish.
    Delete {
        /// The type of entity to delete.
        entity: DeleteTarget,

        /// The entity name.
        name: String,
    },
}

/// Entity types that can be listed and looked up.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    /// An organization.
    #[value(alias = "organizations", alias = "org", alias = "orgs")]
    Organization,
    /// A space of the targeted organization.
    #[value(alias = "spaces")]
    Space,
    /// A space quota of the targeted organization.
    #[value(alias = "space-quotas")]
    SpaceQuota,
}

/// Entity types that can be deleted.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum DeleteTarget {
    /// A service instance of the targeted space.
    ServiceInstance,
    /// A space of the targeted organization.
    Space,
}
