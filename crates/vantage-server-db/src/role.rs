// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Role repository for database operations.
//!
//! This module is the permission/role store:
//! - The global `permissions` table, seeded from the permission catalog
//! - Tenant-scoped roles and their grants
//! - Users and their (optional) role assignment
//!
//! A role only ever contributes grants to users of its own organization.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use uuid::Uuid;
use vantage_server_auth::{OrgId, Permission, RoleId, UserId};

use crate::convert::{parse_id, parse_timestamp};
use crate::error::DbError;

/// A role row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
	pub id: RoleId,
	pub org_id: OrgId,
	pub name: String,
	pub description: Option<String>,
	pub is_system: bool,
	pub created_at: DateTime<Utc>,
}

/// A user row as far as authorization is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	pub id: UserId,
	pub org_id: OrgId,
	pub email: String,
	pub role_id: Option<RoleId>,
	pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait RoleStore: Send + Sync {
	async fn ensure_permissions(&self, permissions: &[Permission]) -> Result<(), DbError>;
	async fn create_role(
		&self,
		org_id: &OrgId,
		name: &str,
		description: Option<&str>,
		permissions: &[Permission],
	) -> Result<RoleRecord, DbError>;
	async fn list_roles(&self, org_id: &OrgId) -> Result<Vec<RoleRecord>, DbError>;
	async fn get_role_permissions(&self, role_id: &RoleId) -> Result<Vec<Permission>, DbError>;
	async fn create_user(
		&self,
		org_id: &OrgId,
		email: &str,
		role_id: Option<&RoleId>,
	) -> Result<UserRecord, DbError>;
	async fn assign_role(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
		role_id: Option<&RoleId>,
	) -> Result<(), DbError>;
	async fn get_permissions_for_user(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
	) -> Result<Vec<Permission>, DbError>;
}

/// Repository for roles, permissions and user role assignment.
#[derive(Clone)]
pub struct RoleRepository {
	pool: SqlitePool,
}

impl RoleRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Permissions
	// =========================================================================

	/// Insert any of `permissions` not yet present. Existing rows keep their ids.
	#[tracing::instrument(skip(self, permissions), fields(count = permissions.len()))]
	pub async fn ensure_permissions(&self, permissions: &[Permission]) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		for permission in permissions {
			sqlx::query("INSERT OR IGNORE INTO permissions (id, resource, action) VALUES (?, ?, ?)")
				.bind(Uuid::new_v4().to_string())
				.bind(permission.resource.as_str())
				.bind(permission.action.as_str())
				.execute(&mut *tx)
				.await?;
		}

		tx.commit().await?;
		tracing::debug!(count = permissions.len(), "permissions ensured");
		Ok(())
	}

	// =========================================================================
	// Roles
	// =========================================================================

	/// Create a role in `org_id` granting exactly `permissions`.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the organization already has a role with
	/// this name.
	#[tracing::instrument(skip(self, description, permissions), fields(org_id = %org_id, name = %name))]
	pub async fn create_role(
		&self,
		org_id: &OrgId,
		name: &str,
		description: Option<&str>,
		permissions: &[Permission],
	) -> Result<RoleRecord, DbError> {
		let role = RoleRecord {
			id: RoleId::generate(),
			org_id: *org_id,
			name: name.to_string(),
			description: description.map(str::to_string),
			is_system: false,
			created_at: Utc::now(),
		};

		let mut tx = self.pool.begin().await?;

		sqlx::query(
			r#"
			INSERT INTO roles (id, organization_id, name, description, is_system, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(role.id.to_string())
		.bind(role.org_id.to_string())
		.bind(&role.name)
		.bind(&role.description)
		.bind(role.is_system as i32)
		.bind(role.created_at.to_rfc3339())
		.execute(&mut *tx)
		.await
		.map_err(|e| DbError::conflict_on_unique(e, "Role"))?;

		for permission in permissions {
			sqlx::query("INSERT OR IGNORE INTO permissions (id, resource, action) VALUES (?, ?, ?)")
				.bind(Uuid::new_v4().to_string())
				.bind(permission.resource.as_str())
				.bind(permission.action.as_str())
				.execute(&mut *tx)
				.await?;

			sqlx::query(
				r#"
				INSERT OR IGNORE INTO role_permissions (role_id, permission_id)
				SELECT ?, id FROM permissions WHERE resource = ? AND action = ?
				"#,
			)
			.bind(role.id.to_string())
			.bind(permission.resource.as_str())
			.bind(permission.action.as_str())
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;
		tracing::info!(role_id = %role.id, grants = permissions.len(), "role created");
		Ok(role)
	}

	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn list_roles(&self, org_id: &OrgId) -> Result<Vec<RoleRecord>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, organization_id, name, description, is_system, created_at
			FROM roles
			WHERE organization_id = ?
			ORDER BY created_at ASC, name ASC
			"#,
		)
		.bind(org_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_role).collect()
	}

	#[tracing::instrument(skip(self), fields(role_id = %role_id))]
	pub async fn get_role_permissions(&self, role_id: &RoleId) -> Result<Vec<Permission>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT p.resource, p.action
			FROM role_permissions rp
			JOIN permissions p ON p.id = rp.permission_id
			WHERE rp.role_id = ?
			ORDER BY p.resource, p.action
			"#,
		)
		.bind(role_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		Ok(rows.iter().filter_map(row_to_permission).collect())
	}

	// =========================================================================
	// Users
	// =========================================================================

	/// Create a user in `org_id`, optionally with a role of the same
	/// organization.
	///
	/// # Errors
	/// - `DbError::NotFound` if `role_id` is not a role of `org_id`
	/// - `DbError::Conflict` if the email is taken
	#[tracing::instrument(skip(self, email), fields(org_id = %org_id))]
	pub async fn create_user(
		&self,
		org_id: &OrgId,
		email: &str,
		role_id: Option<&RoleId>,
	) -> Result<UserRecord, DbError> {
		if let Some(role_id) = role_id {
			self.require_role_in_org(org_id, role_id).await?;
		}

		let user = UserRecord {
			id: UserId::generate(),
			org_id: *org_id,
			email: email.to_string(),
			role_id: role_id.copied(),
			created_at: Utc::now(),
		};

		sqlx::query(
			r#"
			INSERT INTO users (id, organization_id, email, role_id, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(user.id.to_string())
		.bind(user.org_id.to_string())
		.bind(&user.email)
		.bind(user.role_id.map(|r| r.to_string()))
		.bind(user.created_at.to_rfc3339())
		.execute(&self.pool)
		.await
		.map_err(|e| DbError::conflict_on_unique(e, "User"))?;

		tracing::info!(user_id = %user.id, "user created");
		Ok(user)
	}

	/// Set or clear a user's role. Both the user and the role must belong to
	/// `org_id`.
	#[tracing::instrument(skip(self), fields(org_id = %org_id, user_id = %user_id))]
	pub async fn assign_role(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
		role_id: Option<&RoleId>,
	) -> Result<(), DbError> {
		if let Some(role_id) = role_id {
			self.require_role_in_org(org_id, role_id).await?;
		}

		let result = sqlx::query("UPDATE users SET role_id = ? WHERE id = ? AND organization_id = ?")
			.bind(role_id.map(|r| r.to_string()))
			.bind(user_id.to_string())
			.bind(org_id.to_string())
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("User {user_id}")));
		}

		tracing::info!(role_id = ?role_id.map(|r| r.to_string()), "role assigned");
		Ok(())
	}

	/// Grants of the user's role, restricted to roles of the user's own
	/// organization. Users without a role, or unknown users, get nothing.
	///
	/// Rows naming a resource or action this build does not know are skipped
	/// with a warning.
	#[tracing::instrument(skip(self), fields(org_id = %org_id, user_id = %user_id))]
	pub async fn get_permissions_for_user(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
	) -> Result<Vec<Permission>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT p.resource, p.action
			FROM users u
			JOIN roles r ON r.id = u.role_id AND r.organization_id = u.organization_id
			JOIN role_permissions rp ON rp.role_id = r.id
			JOIN permissions p ON p.id = rp.permission_id
			WHERE u.id = ? AND u.organization_id = ?
			"#,
		)
		.bind(user_id.to_string())
		.bind(org_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let permissions: Vec<Permission> = rows.iter().filter_map(row_to_permission).collect();
		tracing::debug!(count = permissions.len(), "loaded user permissions");
		Ok(permissions)
	}

	// =========================================================================
	// Helpers
	// =========================================================================

	async fn require_role_in_org(&self, org_id: &OrgId, role_id: &RoleId) -> Result<(), DbError> {
		let exists: Option<i64> =
			sqlx::query_scalar("SELECT 1 FROM roles WHERE id = ? AND organization_id = ?")
				.bind(role_id.to_string())
				.bind(org_id.to_string())
				.fetch_optional(&self.pool)
				.await?;

		match exists {
			Some(_) => Ok(()),
			None => Err(DbError::NotFound(format!("Role {role_id}"))),
		}
	}
}

fn row_to_role(row: &sqlx::sqlite::SqliteRow) -> Result<RoleRecord, DbError> {
	let id: String = row.get("id");
	let org_id: String = row.get("organization_id");
	let is_system: i32 = row.get("is_system");
	let created_at: String = row.get("created_at");

	Ok(RoleRecord {
		id: parse_id(&id, "role")?,
		org_id: parse_id(&org_id, "organization")?,
		name: row.get("name"),
		description: row.get("description"),
		is_system: is_system != 0,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}

fn row_to_permission(row: &sqlx::sqlite::SqliteRow) -> Option<Permission> {
	let resource: String = row.get("resource");
	let action: String = row.get("action");
	match Permission::from_parts(&resource, &action) {
		Ok(permission) => Some(permission),
		Err(e) => {
			tracing::warn!(%resource, %action, error = %e, "skipping unrecognised permission row");
			None
		}
	}
}

#[async_trait]
impl RoleStore for RoleRepository {
	async fn ensure_permissions(&self, permissions: &[Permission]) -> Result<(), DbError> {
		self.ensure_permissions(permissions).await
	}

	async fn create_role(
		&self,
		org_id: &OrgId,
		name: &str,
		description: Option<&str>,
		permissions: &[Permission],
	) -> Result<RoleRecord, DbError> {
		self.create_role(org_id, name, description, permissions).await
	}

	async fn list_roles(&self, org_id: &OrgId) -> Result<Vec<RoleRecord>, DbError> {
		self.list_roles(org_id).await
	}

	async fn get_role_permissions(&self, role_id: &RoleId) -> Result<Vec<Permission>, DbError> {
		self.get_role_permissions(role_id).await
	}

	async fn create_user(
		&self,
		org_id: &OrgId,
		email: &str,
		role_id: Option<&RoleId>,
	) -> Result<UserRecord, DbError> {
		self.create_user(org_id, email, role_id).await
	}

	async fn assign_role(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
		role_id: Option<&RoleId>,
	) -> Result<(), DbError> {
		self.assign_role(org_id, user_id, role_id).await
	}

	async fn get_permissions_for_user(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
	) -> Result<Vec<Permission>, DbError> {
		self.get_permissions_for_user(org_id, user_id).await
	}
}
