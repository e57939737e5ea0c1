// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Type definitions for policy evaluation.
//!
//! - [`OwnershipFacts`]: the slice of a resource that authorization needs
//!   (tenant, owner, sharing flag)
//! - [`Action`]: the operation family being authorized
//! - [`Decision`] / [`DenyReason`]: the outcome, with the first failed check
//!
//! Facts are read fresh from the store for every decision and never cached
//! across requests.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::permission::{Permission, PermissionAction, PermissionResource};
use crate::types::{OrgId, UserId};

/// Operation families the engine decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	List,
	Read,
	Write,
	Delete,
}

impl Action {
	/// The coarse permission action this operation requires.
	pub fn required_permission(&self) -> PermissionAction {
		match self {
			Action::List | Action::Read => PermissionAction::Read,
			Action::Write => PermissionAction::Write,
			Action::Delete => PermissionAction::Delete,
		}
	}
}

/// Authorization-relevant facts about a single resource instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipFacts {
	pub resource: PermissionResource,
	pub org_id: OrgId,
	/// `None` for system-provisioned resources.
	pub owner_user_id: Option<UserId>,
	pub is_shared: bool,
}

impl OwnershipFacts {
	/// Facts for a dashboard widget.
	pub fn widget(org_id: OrgId, owner_user_id: Option<UserId>, is_shared: bool) -> Self {
		Self {
			resource: PermissionResource::Analytics,
			org_id,
			owner_user_id,
			is_shared,
		}
	}

	/// Returns true if `user_id` owns this resource.
	pub fn is_owned_by(&self, user_id: UserId) -> bool {
		self.owner_user_id == Some(user_id)
	}
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "permission")]
pub enum DenyReason {
	/// The role lacks the coarse grant.
	MissingGrant(Permission),
	/// The resource belongs to another organization.
	CrossTenant,
	/// Not shared and not owned by the principal.
	NotVisible,
	/// Owned by someone else.
	NotOwner,
	/// No owner, and the principal lacks the `manage` override.
	Ownerless,
}

impl fmt::Display for DenyReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DenyReason::MissingGrant(p) => write!(f, "missing grant {p}"),
			DenyReason::CrossTenant => write!(f, "cross-tenant access"),
			DenyReason::NotVisible => write!(f, "resource not visible"),
			DenyReason::NotOwner => write!(f, "not the owner"),
			DenyReason::Ownerless => write!(f, "ownerless resource"),
		}
	}
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
	Allow,
	Deny(DenyReason),
}

impl Decision {
	pub fn is_allowed(&self) -> bool {
		matches!(self, Decision::Allow)
	}

	pub fn deny_reason(&self) -> Option<DenyReason> {
		match self {
			Decision::Allow => None,
			Decision::Deny(reason) => Some(*reason),
		}
	}
}
