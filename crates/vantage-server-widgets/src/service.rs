// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Widget operations.
//!
//! Every operation runs the same checks in the same order and stops at the
//! first failure:
//!
//! 1. identity present ([`WidgetError::Unauthenticated`])
//! 2. coarse grant on `analytics` ([`WidgetError::Forbidden`])
//! 3. id well formed ([`WidgetError::InvalidId`])
//! 4. widget exists in the caller's organization ([`WidgetError::NotFound`])
//! 5. visibility and ownership ([`WidgetError::Forbidden`])
//! 6. payload valid ([`WidgetError::InvalidInput`])
//! 7. store write
//!
//! Steps 1 to 6 are read-only.

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use vantage_server_auth::{
	can_read, evaluate, evaluate_grant, Action, AuthContext, Decision, OrgId, OwnershipFacts,
	PermissionCatalog, PermissionResource, Principal, WidgetId,
};
use vantage_server_db::{NewWidgetRecord, RoleStore, WidgetFilterRecord, WidgetStore};

use crate::defaults::default_widgets;
use crate::error::{Result, WidgetError};
use crate::principal::PrincipalResolver;
use crate::resolver::OwnershipResolver;
use crate::types::{
	CreateWidgetRequest, DisplayType, ReorderWidgetsRequest, UpdateWidgetRequest, WidgetResponse,
	WidgetSize,
};
use crate::validation::{parse_widget_id, parse_widget_ids, WidgetRules};

const DEFAULT_METRIC: &str = "count";
const DEFAULT_COLOR: &str = "blue";

/// Tenant-scoped dashboard widget operations.
#[derive(Clone)]
pub struct WidgetService {
	principals: PrincipalResolver,
	ownership: OwnershipResolver,
	widgets: Arc<dyn WidgetStore>,
	rules: WidgetRules,
}

impl WidgetService {
	pub fn new(
		roles: Arc<dyn RoleStore>,
		widgets: Arc<dyn WidgetStore>,
		catalog: Arc<PermissionCatalog>,
		rules: WidgetRules,
	) -> Self {
		Self {
			principals: PrincipalResolver::new(roles, catalog),
			ownership: OwnershipResolver::new(widgets.clone()),
			widgets,
			rules,
		}
	}

	pub fn rules(&self) -> &WidgetRules {
		&self.rules
	}

	/// Widgets the caller can see: shared ones plus their own, front to back.
	/// An empty dashboard is not an error.
	#[instrument(skip(self, ctx), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id))]
	pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<WidgetResponse>> {
		self.list_inner(ctx).await.inspect_err(log_failure)
	}

	async fn list_inner(&self, ctx: &AuthContext) -> Result<Vec<WidgetResponse>> {
		let principal = self.principals.resolve(ctx).await?;
		require_grant(&principal, Action::List)?;

		let records = self
			.widgets
			.list_visible_widgets(&principal.org_id(), &principal.user_id())
			.await?;

		let viewer = Some(principal.user_id());
		let widgets = records
			.into_iter()
			.filter(|r| can_read(&principal, &r.ownership_facts()))
			.map(|r| WidgetResponse::from_record(r, viewer))
			.collect::<Result<Vec<_>>>()?;

		tracing::debug!(count = widgets.len(), "listed widgets");
		Ok(widgets)
	}

	#[instrument(skip(self, ctx), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id, widget_id = %id))]
	pub async fn get(&self, ctx: &AuthContext, id: &str) -> Result<WidgetResponse> {
		self.get_inner(ctx, id).await.inspect_err(log_failure)
	}

	async fn get_inner(&self, ctx: &AuthContext, id: &str) -> Result<WidgetResponse> {
		let principal = self.principals.resolve(ctx).await?;
		require_grant(&principal, Action::Read)?;
		let id = parse_widget_id(id)?;
		let facts = self.ownership.resolve_in_org(principal.org_id(), &id).await?;
		authorize(&principal, Action::Read, &facts)?;

		let record = self
			.widgets
			.get_widget_by_id(&principal.org_id(), &id)
			.await?
			.ok_or(WidgetError::NotFound)?;
		WidgetResponse::from_record(record, Some(principal.user_id()))
	}

	/// Creates a widget owned by the caller, appended after the current last
	/// widget of the organization.
	#[instrument(skip(self, ctx, req), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id))]
	pub async fn create(&self, ctx: &AuthContext, req: CreateWidgetRequest) -> Result<WidgetResponse> {
		self.create_inner(ctx, req).await.inspect_err(log_failure)
	}

	async fn create_inner(&self, ctx: &AuthContext, req: CreateWidgetRequest) -> Result<WidgetResponse> {
		let principal = self.principals.resolve(ctx).await?;
		require_grant(&principal, Action::Write)?;

		let name = self.rules.validate_name(&req.name)?;
		self.rules.validate_data_source(&req.data_source)?;
		self.rules.validate_filters(&req.filters)?;

		let new_widget = NewWidgetRecord {
			id: WidgetId::generate(),
			org_id: principal.org_id(),
			user_id: Some(principal.user_id()),
			name,
			description: req.description,
			data_source: req.data_source,
			metric: req.metric.unwrap_or_else(|| DEFAULT_METRIC.to_string()),
			display_type: req
				.display_type
				.unwrap_or(DisplayType::Number)
				.as_str()
				.to_string(),
			show_change: req.show_change.unwrap_or(true),
			color: req.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
			size: req.size.unwrap_or(WidgetSize::Small).as_str().to_string(),
			filters: req.filters.iter().map(WidgetFilterRecord::from).collect(),
			is_shared: req.is_shared,
			is_default: false,
		};

		let record = self.widgets.create_widget(&new_widget).await?;
		tracing::info!(
			widget_id = %record.id,
			display_order = record.display_order,
			"widget created"
		);
		WidgetResponse::from_record(record, Some(principal.user_id()))
	}

	/// Overwrites only the fields present in `req`. Owner only; sharing does
	/// not extend write access.
	#[instrument(skip(self, ctx, req), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id, widget_id = %id))]
	pub async fn update(
		&self,
		ctx: &AuthContext,
		id: &str,
		req: UpdateWidgetRequest,
	) -> Result<WidgetResponse> {
		self.update_inner(ctx, id, req).await.inspect_err(log_failure)
	}

	async fn update_inner(
		&self,
		ctx: &AuthContext,
		id: &str,
		req: UpdateWidgetRequest,
	) -> Result<WidgetResponse> {
		let principal = self.principals.resolve(ctx).await?;
		require_grant(&principal, Action::Write)?;
		let id = parse_widget_id(id)?;
		let facts = self.ownership.resolve_in_org(principal.org_id(), &id).await?;
		authorize(&principal, Action::Write, &facts)?;

		let name = req
			.name
			.as_deref()
			.map(|n| self.rules.validate_name(n))
			.transpose()?;
		if let Some(data_source) = &req.data_source {
			self.rules.validate_data_source(data_source)?;
		}
		if let Some(filters) = &req.filters {
			self.rules.validate_filters(filters)?;
		}

		let mut record = self
			.widgets
			.get_widget_by_id(&principal.org_id(), &id)
			.await?
			.ok_or(WidgetError::NotFound)?;

		if let Some(name) = name {
			record.name = name;
		}
		if let Some(description) = req.description {
			record.description = description;
		}
		if let Some(data_source) = req.data_source {
			record.data_source = data_source;
		}
		if let Some(metric) = req.metric {
			record.metric = metric;
		}
		if let Some(display_type) = req.display_type {
			record.display_type = display_type.as_str().to_string();
		}
		if let Some(show_change) = req.show_change {
			record.show_change = show_change;
		}
		if let Some(color) = req.color {
			record.color = color;
		}
		if let Some(size) = req.size {
			record.size = size.as_str().to_string();
		}
		if let Some(filters) = req.filters {
			record.filters = filters.iter().map(WidgetFilterRecord::from).collect();
		}
		if let Some(is_shared) = req.is_shared {
			record.is_shared = is_shared;
		}
		record.updated_at = Utc::now();

		let updated = self.widgets.update_widget(&record).await?;
		tracing::info!("widget updated");
		WidgetResponse::from_record(updated, Some(principal.user_id()))
	}

	/// Removes a widget permanently. Owner only.
	#[instrument(skip(self, ctx), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id, widget_id = %id))]
	pub async fn delete(&self, ctx: &AuthContext, id: &str) -> Result<()> {
		self.delete_inner(ctx, id).await.inspect_err(log_failure)
	}

	async fn delete_inner(&self, ctx: &AuthContext, id: &str) -> Result<()> {
		let principal = self.principals.resolve(ctx).await?;
		require_grant(&principal, Action::Delete)?;
		let id = parse_widget_id(id)?;
		let facts = self.ownership.resolve_in_org(principal.org_id(), &id).await?;
		authorize(&principal, Action::Delete, &facts)?;

		if !self.widgets.delete_widget(&principal.org_id(), &id).await? {
			return Err(WidgetError::NotFound);
		}
		tracing::info!("widget deleted");
		Ok(())
	}

	/// Assigns `display_order = position` to each listed widget in one
	/// transaction. Widgets not listed keep their order. If any id is not a
	/// widget of the caller's organization nothing changes.
	#[instrument(skip(self, ctx, req), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id, count = req.widget_ids.len()))]
	pub async fn reorder(&self, ctx: &AuthContext, req: ReorderWidgetsRequest) -> Result<()> {
		self.reorder_inner(ctx, req).await.inspect_err(log_failure)
	}

	async fn reorder_inner(&self, ctx: &AuthContext, req: ReorderWidgetsRequest) -> Result<()> {
		let principal = self.principals.resolve(ctx).await?;
		require_grant(&principal, Action::Write)?;
		let ids = parse_widget_ids(&req.widget_ids)?;

		self.widgets.reorder_widgets(&principal.org_id(), &ids).await?;
		tracing::info!(count = ids.len(), "widgets reordered");
		Ok(())
	}

	/// Creates the starter dashboard for an organization that has no widgets
	/// yet. Returns the created widgets, or nothing if the organization
	/// already has some.
	///
	/// System operation: no principal is involved.
	#[instrument(skip(self), fields(org_id = %org_id))]
	pub async fn provision_default_widgets(&self, org_id: &OrgId) -> Result<Vec<WidgetResponse>> {
		let existing = self.widgets.list_widgets_for_org(org_id).await?;
		if !existing.is_empty() {
			tracing::debug!(count = existing.len(), "organization already has widgets");
			return Ok(Vec::new());
		}

		let mut created = Vec::new();
		for widget in default_widgets(*org_id, &self.rules) {
			let record = self.widgets.create_widget(&widget).await?;
			created.push(WidgetResponse::from_record(record, None)?);
		}
		tracing::info!(count = created.len(), "default widgets provisioned");
		Ok(created)
	}
}

// =============================================================================
// Authorization helpers
// =============================================================================

fn require_grant(principal: &Principal, action: Action) -> Result<()> {
	check(
		evaluate_grant(principal, PermissionResource::Analytics, action),
		action,
	)
}

fn authorize(principal: &Principal, action: Action, facts: &OwnershipFacts) -> Result<()> {
	check(evaluate(principal, action, facts), action)
}

fn check(decision: Decision, action: Action) -> Result<()> {
	match decision {
		Decision::Allow => Ok(()),
		Decision::Deny(reason) => {
			tracing::warn!(?action, %reason, "widget access denied");
			Err(WidgetError::Forbidden(reason))
		}
	}
}

fn log_failure(err: &WidgetError) {
	if err.is_internal() {
		tracing::error!(error = %err, "widget operation failed");
	}
}
