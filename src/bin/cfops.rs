//! Cloud Foundry operations CLI binary.
//!
//! A command-line interface for name-based Cloud Foundry operations.

use cfops::cli::{Cli, Command, DeleteTarget, Entity};
use cfops::{CfClient, CloudFoundryOperations, Organization, PrettyPrint, Space, SpaceQuota};
use clap::Parser;
use futures::TryStreamExt;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let client = match CfClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set CF_API_URL and CF_ACCESS_TOKEN environment variables");
            return ExitCode::FAILURE;
        }
    };

    let mut builder = CloudFoundryOperations::builder(client).poll_config(cli.poll_config());
    if let Some(ref org) = cli.org {
        builder = builder.organization(org);
    }
    if let Some(ref space) = cli.space {
        builder = builder.space(space);
    }
    let operations = builder.build();

    match run(&operations, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(operations: &CloudFoundryOperations, cli: Cli) -> cfops::Result<()> {
    match cli.command {
        Command::List { entity } => handle_list(operations, entity, cli.json).await,
        Command::Get { entity, name } => handle_get(operations, entity, &name, cli.json).await,
        Command::Delete { entity, name } => {
            let completed = match entity {
                DeleteTarget::ServiceInstance => operations.delete_service_instance(&name).await?,
                DeleteTarget::Space => operations.delete_space(&name).await?,
            };
            output_single(&completed, cli.json)
        }
    }
}

async fn handle_list(
    operations: &CloudFoundryOperations,
    entity: Entity,
    json: bool,
) -> cfops::Result<()> {
    match entity {
        Entity::Organization => {
            let orgs: Vec<Organization> = operations.organizations().try_collect().await?;
            output_list(&orgs, json, |o| OrganizationRow::from(o))
        }
        Entity::Space => {
            let spaces: Vec<Space> = operations.spaces().try_collect().await?;
            output_list(&spaces, json, |s| SpaceRow::from(s))
        }
        Entity::SpaceQuota => {
            let quotas: Vec<SpaceQuota> = operations.space_quotas().try_collect().await?;
            output_list(&quotas, json, |q| SpaceQuotaRow::from(q))
        }
    }
}

async fn handle_get(
    operations: &CloudFoundryOperations,
    entity: Entity,
    name: &str,
    json: bool,
) -> cfops::Result<()> {
    match entity {
        Entity::Organization => output_single(&operations.get_organization(name).await?, json),
        Entity::Space => output_single(&operations.get_space(name).await?, json),
        Entity::SpaceQuota => output_single(&operations.get_space_quota(name).await?, json),
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> cfops::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> cfops::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct OrganizationRow {
    name: String,
    status: String,
    guid: String,
}

impl From<&Organization> for OrganizationRow {
    fn from(o: &Organization) -> Self {
        Self {
            name: o.name.clone(),
            status: o.status.clone().unwrap_or_default(),
            guid: o.id.clone(),
        }
    }
}

#[derive(Tabled)]
struct SpaceRow {
    name: String,
    ssh: String,
    guid: String,
}

impl From<&Space> for SpaceRow {
    fn from(s: &Space) -> Self {
        Self {
            name: s.name.clone(),
            ssh: if s.allow_ssh { "enabled" } else { "disabled" }.to_string(),
            guid: s.id.clone(),
        }
    }
}

#[derive(Tabled)]
struct SpaceQuotaRow {
    name: String,
    #[tabled(rename = "total memory")]
    total_memory: String,
    #[tabled(rename = "instance memory")]
    instance_memory: String,
    routes: i64,
    services: i64,
    #[tabled(rename = "paid plans")]
    paid_plans: bool,
}

impl From<&SpaceQuota> for SpaceQuotaRow {
    fn from(q: &SpaceQuota) -> Self {
        Self {
            name: q.name.clone(),
            total_memory: format!("{}M", q.total_memory_limit),
            instance_memory: if q.instance_memory_limit < 0 {
                "unlimited".to_string()
            } else {
                format!("{}M", q.instance_memory_limit)
            },
            routes: q.total_routes,
            services: q.total_services,
            paid_plans: q.paid_service_plans,
        }
    }
}
