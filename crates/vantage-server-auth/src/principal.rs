// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request identity and the per-request principal.
//!
//! [`AuthContext`] is what the identity provider hands over: an organization id
//! and a user id, either of which may be missing. A [`Principal`] is only ever
//! built from a complete identity plus a resolved [`PermissionSet`], and is
//! immutable afterwards. "No principal" is therefore a distinct state from "a
//! principal with no permissions".

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::permission::{PermissionAction, PermissionResource, PermissionSet};
use crate::types::{OrgId, UserId};

/// Raw identity attached to a request by the authentication layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
	pub org_id: Option<OrgId>,
	pub user_id: Option<UserId>,
}

impl AuthContext {
	/// A context carrying no identity at all.
	pub fn anonymous() -> Self {
		Self::default()
	}

	/// A fully authenticated context.
	pub fn authenticated(org_id: OrgId, user_id: UserId) -> Self {
		Self {
			org_id: Some(org_id),
			user_id: Some(user_id),
		}
	}

	/// Returns the organization and user ids, or
	/// [`AuthError::AuthenticationRequired`] if either is absent.
	pub fn require_identity(&self) -> Result<(OrgId, UserId), AuthError> {
		match (self.org_id, self.user_id) {
			(Some(org_id), Some(user_id)) => Ok((org_id, user_id)),
			_ => Err(AuthError::AuthenticationRequired),
		}
	}
}

/// An authenticated actor inside one organization, scoped to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
	org_id: OrgId,
	user_id: UserId,
	permissions: PermissionSet,
}

impl Principal {
	pub fn new(org_id: OrgId, user_id: UserId, permissions: PermissionSet) -> Self {
		Self {
			org_id,
			user_id,
			permissions,
		}
	}

	pub fn org_id(&self) -> OrgId {
		self.org_id
	}

	pub fn user_id(&self) -> UserId {
		self.user_id
	}

	pub fn permissions(&self) -> &PermissionSet {
		&self.permissions
	}

	/// Returns true if the principal's role grants `action` on `resource`.
	pub fn has_permission(&self, resource: PermissionResource, action: PermissionAction) -> bool {
		self.permissions.allows(resource, action)
	}

	/// Returns true if `org_id` is the principal's own organization.
	pub fn is_in_org(&self, org_id: OrgId) -> bool {
		self.org_id == org_id
	}
}
