// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builds the request-scoped [`Principal`] from the identity handed over by
//! the transport.

use std::sync::Arc;
use tracing::instrument;
use vantage_server_auth::{AuthContext, PermissionCatalog, Principal};
use vantage_server_db::RoleStore;

use crate::error::{Result, WidgetError};

/// Resolves an [`AuthContext`] into a [`Principal`] by loading the user's
/// role grants.
#[derive(Clone)]
pub struct PrincipalResolver {
	roles: Arc<dyn RoleStore>,
	catalog: Arc<PermissionCatalog>,
}

impl PrincipalResolver {
	pub fn new(roles: Arc<dyn RoleStore>, catalog: Arc<PermissionCatalog>) -> Self {
		Self { roles, catalog }
	}

	/// Fails with [`WidgetError::Unauthenticated`] before touching the store
	/// when either half of the identity is missing. A user with no role, or
	/// one the store does not know, resolves with an empty permission set.
	#[instrument(skip(self, ctx), fields(org_id = ?ctx.org_id, user_id = ?ctx.user_id))]
	pub async fn resolve(&self, ctx: &AuthContext) -> Result<Principal> {
		let (org_id, user_id) = ctx
			.require_identity()
			.map_err(|_| WidgetError::Unauthenticated)?;

		let grants = self.roles.get_permissions_for_user(&org_id, &user_id).await?;
		let permissions = self.catalog.resolve_grants(grants);

		tracing::debug!(permission_count = permissions.len(), "principal resolved");
		Ok(Principal::new(org_id, user_id, permissions))
	}
}
