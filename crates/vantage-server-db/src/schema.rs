// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Idempotent schema bootstrap.
//!
//! Organizations themselves are owned by the identity layer; only their ids
//! appear here, as the tenant column on every tenant-scoped table.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS permissions (
		id TEXT PRIMARY KEY,
		resource TEXT NOT NULL,
		action TEXT NOT NULL,
		UNIQUE(resource, action)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS roles (
		id TEXT PRIMARY KEY,
		organization_id TEXT NOT NULL,
		name TEXT NOT NULL,
		description TEXT,
		is_system INTEGER NOT NULL DEFAULT 0,
		created_at TEXT NOT NULL,
		UNIQUE(organization_id, name)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS role_permissions (
		role_id TEXT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
		permission_id TEXT NOT NULL REFERENCES permissions(id) ON DELETE CASCADE,
		PRIMARY KEY (role_id, permission_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY,
		organization_id TEXT NOT NULL,
		email TEXT NOT NULL UNIQUE,
		role_id TEXT REFERENCES roles(id) ON DELETE SET NULL,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS dashboard_widgets (
		id TEXT PRIMARY KEY,
		organization_id TEXT NOT NULL,
		user_id TEXT,
		name TEXT NOT NULL,
		description TEXT NOT NULL DEFAULT '',
		data_source TEXT NOT NULL,
		metric TEXT NOT NULL,
		display_type TEXT NOT NULL,
		show_change INTEGER NOT NULL DEFAULT 1,
		color TEXT NOT NULL,
		size TEXT NOT NULL,
		filters TEXT NOT NULL DEFAULT '[]',
		display_order INTEGER NOT NULL DEFAULT 0,
		is_shared INTEGER NOT NULL DEFAULT 0,
		is_default INTEGER NOT NULL DEFAULT 0,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_users_org ON users(organization_id)",
	"CREATE INDEX IF NOT EXISTS idx_dashboard_widgets_org_order ON dashboard_widgets(organization_id, display_order)",
	"CREATE INDEX IF NOT EXISTS idx_dashboard_widgets_user ON dashboard_widgets(user_id)",
];

/// Create every table and index if missing. Safe to run on each startup.
#[tracing::instrument(skip(pool))]
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!(statements = SCHEMA.len(), "schema ensured");
	Ok(())
}
