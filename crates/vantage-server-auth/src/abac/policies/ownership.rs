// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Instance-level policy for owned, optionally shared resources.
//!
//! Runs after the coarse grant and tenant checks have passed. Sharing grants
//! read visibility to the whole organization; writes and deletes stay with the
//! owner. Ownerless resources can only be modified with the `manage` override.

use crate::abac::{Action, Decision, DenyReason, OwnershipFacts};
use crate::permission::PermissionAction;
use crate::principal::Principal;

/// Evaluates the ownership and sharing rules for `action`.
pub fn evaluate(principal: &Principal, action: Action, facts: &OwnershipFacts) -> Decision {
	if !is_visible(principal, facts) {
		return Decision::Deny(DenyReason::NotVisible);
	}

	match action {
		Action::List | Action::Read => Decision::Allow,
		Action::Write | Action::Delete => can_modify(principal, facts),
	}
}

fn is_visible(principal: &Principal, facts: &OwnershipFacts) -> bool {
	facts.is_shared || facts.is_owned_by(principal.user_id())
}

fn can_modify(principal: &Principal, facts: &OwnershipFacts) -> Decision {
	match facts.owner_user_id {
		Some(owner) if owner == principal.user_id() => Decision::Allow,
		Some(_) => Decision::Deny(DenyReason::NotOwner),
		None if principal.has_permission(facts.resource, PermissionAction::Manage) => Decision::Allow,
		None => Decision::Deny(DenyReason::Ownerless),
	}
}
