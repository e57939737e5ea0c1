// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ownership resolution: the authorization facts of one widget, read fresh
//! from the store on every call.

use std::sync::Arc;
use tracing::instrument;
use vantage_server_auth::{OrgId, OwnershipFacts, WidgetId};
use vantage_server_db::WidgetStore;

use crate::error::{Result, WidgetError};

#[derive(Clone)]
pub struct OwnershipResolver {
	widgets: Arc<dyn WidgetStore>,
}

impl OwnershipResolver {
	pub fn new(widgets: Arc<dyn WidgetStore>) -> Self {
		Self { widgets }
	}

	/// Facts for `id` in whichever organization holds it, or `None` if no
	/// such widget exists.
	#[instrument(skip(self), fields(widget_id = %id))]
	pub async fn resolve(&self, id: &WidgetId) -> Result<Option<OwnershipFacts>> {
		Ok(self.widgets.get_ownership_facts(id).await?)
	}

	/// Facts for `id` as seen from `org_id`. A widget of another organization
	/// is reported exactly like a missing one.
	pub async fn resolve_in_org(&self, org_id: OrgId, id: &WidgetId) -> Result<OwnershipFacts> {
		match self.resolve(id).await? {
			Some(facts) if facts.org_id == org_id => Ok(facts),
			Some(_) => {
				tracing::debug!(widget_id = %id, "widget belongs to another organization");
				Err(WidgetError::NotFound)
			}
			None => Err(WidgetError::NotFound),
		}
	}
}
