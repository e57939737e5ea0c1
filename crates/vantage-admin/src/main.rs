// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Vantage admin CLI.
//!
//! Drives the widget service directly against the configured database, acting
//! as the identity given by `--org` and `--user`. Results are printed as JSON
//! on stdout; logs go to stderr.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vantage_server_auth::{AuthContext, OrgId, Permission, PermissionCatalog, RoleId, UserId};
use vantage_server_db::{create_pool, ensure_schema, RoleRepository, WidgetRepository};
use vantage_server_widgets::{
	CreateWidgetRequest, ReorderWidgetsRequest, UpdateWidgetRequest, WidgetError, WidgetRules,
	WidgetService,
};

/// Vantage admin - manage roles and dashboard widgets.
#[derive(Parser, Debug)]
#[command(name = "vantage-admin", about = "Vantage roles and dashboard widgets", version)]
struct Args {
	/// Config file to layer between defaults and environment
	#[arg(long, global = true, env = "VANTAGE_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Create the schema and register the permission catalog
	Init,
	/// Manage roles
	Role {
		#[command(subcommand)]
		command: RoleCommand,
	},
	/// Manage users
	User {
		#[command(subcommand)]
		command: UserCommand,
	},
	/// Operate on dashboard widgets as a user
	Widget(WidgetArgs),
}

#[derive(Subcommand, Debug)]
enum RoleCommand {
	/// Create a role with the given grants
	Create {
		#[arg(long)]
		org: OrgId,
		#[arg(long)]
		name: String,
		#[arg(long)]
		description: Option<String>,
		/// `resource:action` grants, comma separated
		#[arg(long = "permissions", value_delimiter = ',')]
		permissions: Vec<String>,
	},
	List {
		#[arg(long)]
		org: OrgId,
	},
}

#[derive(Subcommand, Debug)]
enum UserCommand {
	Create {
		#[arg(long)]
		org: OrgId,
		#[arg(long)]
		email: String,
		#[arg(long)]
		role: Option<RoleId>,
	},
	/// Assign a role, or clear it when `--role` is omitted
	AssignRole {
		#[arg(long)]
		org: OrgId,
		#[arg(long)]
		user: UserId,
		#[arg(long)]
		role: Option<RoleId>,
	},
}

#[derive(clap::Args, Debug)]
struct WidgetArgs {
	/// Organization of the acting user
	#[arg(long, env = "VANTAGE_ORG_ID")]
	org: Option<OrgId>,

	/// Acting user
	#[arg(long, env = "VANTAGE_USER_ID")]
	user: Option<UserId>,

	#[command(subcommand)]
	command: WidgetCommand,
}

#[derive(Subcommand, Debug)]
enum WidgetCommand {
	List,
	Get {
		id: String,
	},
	/// Create from a JSON payload
	Create {
		json: String,
	},
	/// Update from a JSON payload; absent fields are kept
	Update {
		id: String,
		json: String,
	},
	Delete {
		id: String,
	},
	/// New front-to-back order
	Reorder {
		#[arg(required = true)]
		ids: Vec<String>,
	},
	/// Provision the starter dashboard for `--org`
	SeedDefaults,
	/// Data sources accepted by create and update
	DataSources,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
	let args = Args::parse();

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => vantage_server_config::load_config_with_file(path)?,
		None => vantage_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	tracing::debug!(database = %config.database.url, "starting vantage-admin");

	let pool = create_pool(&config.database.url, config.database.max_connections)
		.await
		.context("failed to open database")?;
	let catalog = Arc::new(config.permissions.catalog()?);
	let roles = Arc::new(RoleRepository::new(pool.clone()));

	match args.command {
		Command::Init => {
			ensure_schema(&pool).await?;
			roles.ensure_permissions(catalog.permissions()).await?;
			tracing::info!(permissions = catalog.permissions().len(), "database initialized");
			print_json(&catalog.permissions().iter().map(ToString::to_string).collect::<Vec<_>>())?;
		}
		Command::Role { command } => run_role(&roles, &catalog, command).await?,
		Command::User { command } => run_user(&roles, command).await?,
		Command::Widget(widget_args) => {
			let widgets = Arc::new(WidgetRepository::new(pool));
			let service = WidgetService::new(
				roles,
				widgets,
				catalog,
				WidgetRules::from(&config.widgets),
			);
			if let Err(err) = run_widget(&service, widget_args).await {
				return report(err);
			}
		}
	}

	Ok(ExitCode::SUCCESS)
}

async fn run_role(
	roles: &RoleRepository,
	catalog: &PermissionCatalog,
	command: RoleCommand,
) -> anyhow::Result<()> {
	match command {
		RoleCommand::Create {
			org,
			name,
			description,
			permissions,
		} => {
			let grants = parse_grants(catalog, &permissions)?;
			let role = roles
				.create_role(&org, &name, description.as_deref(), &grants)
				.await?;
			print_json(&role_view(&role, &grants))?;
		}
		RoleCommand::List { org } => {
			let mut views = Vec::new();
			for role in roles.list_roles(&org).await? {
				let grants = roles.get_role_permissions(&role.id).await?;
				views.push(role_view(&role, &grants));
			}
			print_json(&views)?;
		}
	}
	Ok(())
}

async fn run_user(roles: &RoleRepository, command: UserCommand) -> anyhow::Result<()> {
	match command {
		UserCommand::Create { org, email, role } => {
			let user = roles.create_user(&org, &email, role.as_ref()).await?;
			print_json(&serde_json::json!({
				"id": user.id,
				"organization_id": user.org_id,
				"email": user.email,
				"role_id": user.role_id,
			}))?;
		}
		UserCommand::AssignRole { org, user, role } => {
			roles.assign_role(&org, &user, role.as_ref()).await?;
			print_json(&serde_json::json!({ "id": user, "role_id": role }))?;
		}
	}
	Ok(())
}

#[derive(Debug)]
enum WidgetCommandError {
	Service(WidgetError),
	Other(anyhow::Error),
}

impl From<WidgetError> for WidgetCommandError {
	fn from(err: WidgetError) -> Self {
		WidgetCommandError::Service(err)
	}
}

impl From<anyhow::Error> for WidgetCommandError {
	fn from(err: anyhow::Error) -> Self {
		WidgetCommandError::Other(err)
	}
}

async fn run_widget(service: &WidgetService, args: WidgetArgs) -> Result<(), WidgetCommandError> {
	let ctx = AuthContext {
		org_id: args.org,
		user_id: args.user,
	};

	match args.command {
		WidgetCommand::List => print_json(&service.list(&ctx).await?)?,
		WidgetCommand::Get { id } => print_json(&service.get(&ctx, &id).await?)?,
		WidgetCommand::Create { json } => {
			let req: CreateWidgetRequest = parse_payload(&ctx, &json)?;
			print_json(&service.create(&ctx, req).await?)?;
		}
		WidgetCommand::Update { id, json } => {
			let req: UpdateWidgetRequest = parse_payload(&ctx, &json)?;
			print_json(&service.update(&ctx, &id, req).await?)?;
		}
		WidgetCommand::Delete { id } => {
			service.delete(&ctx, &id).await?;
			print_json(&serde_json::json!({ "deleted": id }))?;
		}
		WidgetCommand::Reorder { ids } => {
			service
				.reorder(&ctx, ReorderWidgetsRequest { widget_ids: ids.clone() })
				.await?;
			print_json(&serde_json::json!({ "widget_ids": ids }))?;
		}
		WidgetCommand::SeedDefaults => {
			let Some(org_id) = args.org else {
				return Err(anyhow::anyhow!("seed-defaults requires --org").into());
			};
			print_json(&service.provision_default_widgets(&org_id).await?)?;
		}
		WidgetCommand::DataSources => print_json(service.rules().allowed_data_sources())?,
	}
	Ok(())
}

/// An anonymous caller gets `unauthenticated` before the payload is looked at.
fn parse_payload<T: DeserializeOwned>(ctx: &AuthContext, json: &str) -> Result<T, WidgetError> {
	ctx.require_identity().map_err(|_| WidgetError::Unauthenticated)?;
	serde_json::from_str(json).map_err(|e| WidgetError::InvalidInput(e.to_string()))
}

fn report(err: WidgetCommandError) -> anyhow::Result<ExitCode> {
	match err {
		WidgetCommandError::Service(err) => {
			eprintln!(
				"{}",
				serde_json::json!({ "error": err.kind(), "message": err.to_string() })
			);
			Ok(ExitCode::FAILURE)
		}
		WidgetCommandError::Other(err) => Err(err),
	}
}

fn parse_grants(catalog: &PermissionCatalog, raw: &[String]) -> anyhow::Result<Vec<Permission>> {
	let mut grants = Vec::with_capacity(raw.len());
	for value in raw {
		let permission: Permission = value
			.trim()
			.parse()
			.with_context(|| format!("invalid permission '{value}'"))?;
		if !catalog.contains(&permission) {
			bail!("permission '{permission}' is not in the catalog");
		}
		grants.push(permission);
	}
	Ok(grants)
}

fn role_view(role: &vantage_server_db::RoleRecord, grants: &[Permission]) -> serde_json::Value {
	serde_json::json!({
		"id": role.id,
		"organization_id": role.org_id,
		"name": role.name,
		"description": role.description,
		"is_system": role.is_system,
		"permissions": grants.iter().map(ToString::to_string).collect::<Vec<_>>(),
		"created_at": role.created_at,
	})
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
