// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard widget repository.
//!
//! Every read or write that takes an organization id is scoped to it at the
//! query level. The only unscoped lookups are
//! [`WidgetStore::get_ownership_facts`], whose caller compares the tenant
//! itself, and [`WidgetStore::count_widgets_by_id`].
//!
//! `display_order` is only written at insert time (appended after the current
//! maximum) and by [`WidgetStore::reorder_widgets`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use vantage_server_auth::{OrgId, OwnershipFacts, UserId, WidgetId};

use crate::convert::{parse_id, parse_timestamp};
use crate::error::DbError;

/// A stored filter clause. Kept as plain strings; the service layer owns the
/// vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetFilterRecord {
	pub field: String,
	pub operator: String,
	pub value: String,
}

/// A dashboard widget row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRecord {
	pub id: WidgetId,
	pub org_id: OrgId,
	/// `None` for system-provisioned default widgets.
	pub user_id: Option<UserId>,
	pub name: String,
	pub description: String,
	pub data_source: String,
	pub metric: String,
	pub display_type: String,
	pub show_change: bool,
	pub color: String,
	pub size: String,
	pub filters: Vec<WidgetFilterRecord>,
	pub display_order: i64,
	pub is_shared: bool,
	pub is_default: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl WidgetRecord {
	pub fn ownership_facts(&self) -> OwnershipFacts {
		OwnershipFacts::widget(self.org_id, self.user_id, self.is_shared)
	}
}

/// Insert payload. Display order and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWidgetRecord {
	pub id: WidgetId,
	pub org_id: OrgId,
	pub user_id: Option<UserId>,
	pub name: String,
	pub description: String,
	pub data_source: String,
	pub metric: String,
	pub display_type: String,
	pub show_change: bool,
	pub color: String,
	pub size: String,
	pub filters: Vec<WidgetFilterRecord>,
	pub is_shared: bool,
	pub is_default: bool,
}

#[async_trait]
pub trait WidgetStore: Send + Sync {
	async fn get_ownership_facts(&self, id: &WidgetId) -> Result<Option<OwnershipFacts>, DbError>;
	async fn get_widget_by_id(
		&self,
		org_id: &OrgId,
		id: &WidgetId,
	) -> Result<Option<WidgetRecord>, DbError>;
	async fn list_visible_widgets(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
	) -> Result<Vec<WidgetRecord>, DbError>;
	async fn list_widgets_for_org(&self, org_id: &OrgId) -> Result<Vec<WidgetRecord>, DbError>;
	async fn create_widget(&self, widget: &NewWidgetRecord) -> Result<WidgetRecord, DbError>;
	async fn update_widget(&self, widget: &WidgetRecord) -> Result<WidgetRecord, DbError>;
	async fn delete_widget(&self, org_id: &OrgId, id: &WidgetId) -> Result<bool, DbError>;
	async fn reorder_widgets(&self, org_id: &OrgId, ids: &[WidgetId]) -> Result<(), DbError>;
	async fn count_widgets_by_id(&self, id: &WidgetId) -> Result<i64, DbError>;
}

const WIDGET_COLUMNS: &str = "id, organization_id, user_id, name, description, data_source, metric, \
	display_type, show_change, color, size, filters, display_order, is_shared, is_default, \
	created_at, updated_at";

/// Repository for dashboard widget database operations.
#[derive(Clone)]
pub struct WidgetRepository {
	pool: SqlitePool,
}

impl WidgetRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Lookups
	// =========================================================================

	/// Load the authorization facts for a widget by id alone.
	///
	/// # Returns
	/// `None` if no widget has this id in any organization.
	#[tracing::instrument(skip(self), fields(widget_id = %id))]
	pub async fn get_ownership_facts(&self, id: &WidgetId) -> Result<Option<OwnershipFacts>, DbError> {
		let row = sqlx::query(
			"SELECT organization_id, user_id, is_shared FROM dashboard_widgets WHERE id = ?",
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row
			.map(|r| -> Result<OwnershipFacts, DbError> {
				let org_id: String = r.get("organization_id");
				let user_id: Option<String> = r.get("user_id");
				let is_shared: i32 = r.get("is_shared");
				Ok(OwnershipFacts::widget(
					parse_id(&org_id, "organization")?,
					user_id.as_deref().map(|u| parse_id(u, "user")).transpose()?,
					is_shared != 0,
				))
			})
			.transpose()
	}

	#[tracing::instrument(skip(self), fields(org_id = %org_id, widget_id = %id))]
	pub async fn get_widget_by_id(
		&self,
		org_id: &OrgId,
		id: &WidgetId,
	) -> Result<Option<WidgetRecord>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {WIDGET_COLUMNS} FROM dashboard_widgets WHERE id = ? AND organization_id = ?"
		))
		.bind(id.to_string())
		.bind(org_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_widget(&r)).transpose()
	}

	/// Widgets of `org_id` that are shared or owned by `user_id`, front to back.
	/// Ties on `display_order` fall back to creation order.
	#[tracing::instrument(skip(self), fields(org_id = %org_id, user_id = %user_id))]
	pub async fn list_visible_widgets(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
	) -> Result<Vec<WidgetRecord>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {WIDGET_COLUMNS}
			FROM dashboard_widgets
			WHERE organization_id = ? AND (is_shared = 1 OR user_id = ?)
			ORDER BY display_order ASC, created_at ASC, rowid ASC
			"#
		))
		.bind(org_id.to_string())
		.bind(user_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_widget).collect()
	}

	/// Every widget of `org_id` regardless of visibility, front to back.
	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn list_widgets_for_org(&self, org_id: &OrgId) -> Result<Vec<WidgetRecord>, DbError> {
		let rows = sqlx::query(&format!(
			r#"
			SELECT {WIDGET_COLUMNS}
			FROM dashboard_widgets
			WHERE organization_id = ?
			ORDER BY display_order ASC, created_at ASC, rowid ASC
			"#
		))
		.bind(org_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_widget).collect()
	}

	#[tracing::instrument(skip(self), fields(widget_id = %id))]
	pub async fn count_widgets_by_id(&self, id: &WidgetId) -> Result<i64, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_widgets WHERE id = ?")
			.bind(id.to_string())
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	// =========================================================================
	// Mutations
	// =========================================================================

	/// Insert a widget after the current last one of its organization.
	///
	/// The display order is computed inside the INSERT statement, so two
	/// concurrent creates cannot read the same maximum.
	#[tracing::instrument(skip(self, widget), fields(org_id = %widget.org_id, widget_id = %widget.id))]
	pub async fn create_widget(&self, widget: &NewWidgetRecord) -> Result<WidgetRecord, DbError> {
		let now = Utc::now();
		let filters = serde_json::to_string(&widget.filters)?;

		let display_order: i64 = sqlx::query_scalar(
			r#"
			INSERT INTO dashboard_widgets (
				id, organization_id, user_id, name, description, data_source, metric,
				display_type, show_change, color, size, filters, display_order,
				is_shared, is_default, created_at, updated_at
			)
			SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
				COALESCE((SELECT MAX(display_order) FROM dashboard_widgets WHERE organization_id = ?), -1) + 1,
				?, ?, ?, ?
			RETURNING display_order
			"#,
		)
		.bind(widget.id.to_string())
		.bind(widget.org_id.to_string())
		.bind(widget.user_id.map(|u| u.to_string()))
		.bind(&widget.name)
		.bind(&widget.description)
		.bind(&widget.data_source)
		.bind(&widget.metric)
		.bind(&widget.display_type)
		.bind(widget.show_change as i32)
		.bind(&widget.color)
		.bind(&widget.size)
		.bind(filters)
		.bind(widget.org_id.to_string())
		.bind(widget.is_shared as i32)
		.bind(widget.is_default as i32)
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.fetch_one(&self.pool)
		.await
		.map_err(|e| DbError::conflict_on_unique(e, "Widget"))?;

		tracing::debug!(display_order, "widget row inserted");
		Ok(WidgetRecord {
			id: widget.id,
			org_id: widget.org_id,
			user_id: widget.user_id,
			name: widget.name.clone(),
			description: widget.description.clone(),
			data_source: widget.data_source.clone(),
			metric: widget.metric.clone(),
			display_type: widget.display_type.clone(),
			show_change: widget.show_change,
			color: widget.color.clone(),
			size: widget.size.clone(),
			filters: widget.filters.clone(),
			display_order,
			is_shared: widget.is_shared,
			is_default: widget.is_default,
			created_at: now,
			updated_at: now,
		})
	}

	/// Persist the mutable fields of `widget`.
	///
	/// Tenant, owner, display order, default flag and creation time are never
	/// written here. The row is matched on both id and organization.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no widget with this id exists in the
	/// record's organization.
	#[tracing::instrument(skip(self, widget), fields(org_id = %widget.org_id, widget_id = %widget.id))]
	pub async fn update_widget(&self, widget: &WidgetRecord) -> Result<WidgetRecord, DbError> {
		let now = Utc::now();
		let filters = serde_json::to_string(&widget.filters)?;

		let result = sqlx::query(
			r#"
			UPDATE dashboard_widgets
			SET name = ?, description = ?, data_source = ?, metric = ?, display_type = ?,
				show_change = ?, color = ?, size = ?, filters = ?, is_shared = ?, updated_at = ?
			WHERE id = ? AND organization_id = ?
			"#,
		)
		.bind(&widget.name)
		.bind(&widget.description)
		.bind(&widget.data_source)
		.bind(&widget.metric)
		.bind(&widget.display_type)
		.bind(widget.show_change as i32)
		.bind(&widget.color)
		.bind(&widget.size)
		.bind(filters)
		.bind(widget.is_shared as i32)
		.bind(now.to_rfc3339())
		.bind(widget.id.to_string())
		.bind(widget.org_id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("Widget {}", widget.id)));
		}

		tracing::debug!("widget row updated");
		self
			.get_widget_by_id(&widget.org_id, &widget.id)
			.await?
			.ok_or_else(|| DbError::NotFound(format!("Widget {}", widget.id)))
	}

	/// Hard-delete a widget of `org_id`.
	///
	/// # Returns
	/// `false` if no such widget exists in this organization.
	#[tracing::instrument(skip(self), fields(org_id = %org_id, widget_id = %id))]
	pub async fn delete_widget(&self, org_id: &OrgId, id: &WidgetId) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM dashboard_widgets WHERE id = ? AND organization_id = ?")
			.bind(id.to_string())
			.bind(org_id.to_string())
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!("widget row deleted");
		}
		Ok(deleted)
	}

	/// Assign `display_order = index` to each listed widget, atomically.
	///
	/// Every UPDATE is matched on id and organization. The first id that
	/// matches no row aborts the transaction, which rolls back on drop, so
	/// either every listed widget moves or none does. Widgets not listed keep
	/// their order.
	///
	/// # Errors
	/// Returns `DbError::NotFound` naming the first id outside `org_id`.
	#[tracing::instrument(skip(self, ids), fields(org_id = %org_id, count = ids.len()))]
	pub async fn reorder_widgets(&self, org_id: &OrgId, ids: &[WidgetId]) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		let mut tx = self.pool.begin().await?;

		for (position, id) in ids.iter().enumerate() {
			let result = sqlx::query(
				r#"
				UPDATE dashboard_widgets
				SET display_order = ?, updated_at = ?
				WHERE id = ? AND organization_id = ?
				"#,
			)
			.bind(position as i64)
			.bind(&now)
			.bind(id.to_string())
			.bind(org_id.to_string())
			.execute(&mut *tx)
			.await?;

			if result.rows_affected() != 1 {
				tracing::warn!(widget_id = %id, "reorder aborted: widget not in organization");
				return Err(DbError::NotFound(format!("Widget {id}")));
			}
		}

		tx.commit().await?;
		tracing::debug!(count = ids.len(), "reorder committed");
		Ok(())
	}
}

fn row_to_widget(row: &sqlx::sqlite::SqliteRow) -> Result<WidgetRecord, DbError> {
	let id: String = row.get("id");
	let org_id: String = row.get("organization_id");
	let user_id: Option<String> = row.get("user_id");
	let show_change: i32 = row.get("show_change");
	let filters: String = row.get("filters");
	let is_shared: i32 = row.get("is_shared");
	let is_default: i32 = row.get("is_default");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(WidgetRecord {
		id: parse_id(&id, "widget")?,
		org_id: parse_id(&org_id, "organization")?,
		user_id: user_id.as_deref().map(|u| parse_id(u, "user")).transpose()?,
		name: row.get("name"),
		description: row.get("description"),
		data_source: row.get("data_source"),
		metric: row.get("metric"),
		display_type: row.get("display_type"),
		show_change: show_change != 0,
		color: row.get("color"),
		size: row.get("size"),
		filters: serde_json::from_str(&filters)?,
		display_order: row.get("display_order"),
		is_shared: is_shared != 0,
		is_default: is_default != 0,
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

#[async_trait]
impl WidgetStore for WidgetRepository {
	async fn get_ownership_facts(&self, id: &WidgetId) -> Result<Option<OwnershipFacts>, DbError> {
		self.get_ownership_facts(id).await
	}

	async fn get_widget_by_id(
		&self,
		org_id: &OrgId,
		id: &WidgetId,
	) -> Result<Option<WidgetRecord>, DbError> {
		self.get_widget_by_id(org_id, id).await
	}

	async fn list_visible_widgets(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
	) -> Result<Vec<WidgetRecord>, DbError> {
		self.list_visible_widgets(org_id, user_id).await
	}

	async fn list_widgets_for_org(&self, org_id: &OrgId) -> Result<Vec<WidgetRecord>, DbError> {
		self.list_widgets_for_org(org_id).await
	}

	async fn create_widget(&self, widget: &NewWidgetRecord) -> Result<WidgetRecord, DbError> {
		self.create_widget(widget).await
	}

	async fn update_widget(&self, widget: &WidgetRecord) -> Result<WidgetRecord, DbError> {
		self.update_widget(widget).await
	}

	async fn delete_widget(&self, org_id: &OrgId, id: &WidgetId) -> Result<bool, DbError> {
		self.delete_widget(org_id, id).await
	}

	async fn reorder_widgets(&self, org_id: &OrgId, ids: &[WidgetId]) -> Result<(), DbError> {
		self.reorder_widgets(org_id, ids).await
	}

	async fn count_widgets_by_id(&self, id: &WidgetId) -> Result<i64, DbError> {
		self.count_widgets_by_id(id).await
	}
}
