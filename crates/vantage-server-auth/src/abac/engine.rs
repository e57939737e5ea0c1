// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy evaluation engine.
//!
//! [`evaluate`] is the single decision function. It runs three phases, in
//! order, and reports the first one that fails:
//!
//! 1. **Coarse grant**: the role must hold the permission for the action on the
//!    resource's category. Ownership never substitutes for it.
//! 2. **Tenant boundary**: the resource must live in the principal's
//!    organization.
//! 3. **Instance policy**: sharing and ownership rules
//!    ([`policies::ownership`](super::policies::ownership)).
//!
//! [`evaluate_grant`] runs phase 1 alone, for operations that target a whole
//! category. The `can_*` helpers are boolean views over the same decision. Everything
//! here is pure: no I/O and no hidden state.

use super::policies::ownership;
use super::types::{Action, Decision, DenyReason, OwnershipFacts};
use crate::permission::{Permission, PermissionResource};
use crate::principal::Principal;
use tracing::instrument;

/// Evaluates whether `principal` may perform `action` on the resource
/// described by `facts`.
///
/// # Tracing
///
/// Instrumented at debug level with the user, organization and action; the
/// outcome is logged together with the deny reason.
#[instrument(
    level = "debug",
    skip(principal, facts),
    fields(
        user_id = %principal.user_id(),
        org_id = %principal.org_id(),
        action = ?action,
        resource = %facts.resource,
    )
)]
pub fn evaluate(principal: &Principal, action: Action, facts: &OwnershipFacts) -> Decision {
	let decision = decide(principal, action, facts);
	match decision.deny_reason() {
		None => tracing::debug!("access allowed"),
		Some(reason) => tracing::debug!(%reason, "access denied"),
	}
	decision
}

fn decide(principal: &Principal, action: Action, facts: &OwnershipFacts) -> Decision {
	if let denied @ Decision::Deny(_) = evaluate_grant(principal, facts.resource, action) {
		return denied;
	}

	if !principal.is_in_org(facts.org_id) {
		return Decision::Deny(DenyReason::CrossTenant);
	}

	ownership::evaluate(principal, action, facts)
}

/// The coarse gate on its own: does the role grant `action` on the resource
/// category? Used before any instance is looked up, and for category-wide
/// operations such as create and reorder.
pub fn evaluate_grant(principal: &Principal, resource: PermissionResource, action: Action) -> Decision {
	let required = Permission::new(resource, action.required_permission());
	if principal.permissions().contains(&required) {
		Decision::Allow
	} else {
		Decision::Deny(DenyReason::MissingGrant(required))
	}
}

/// Coarse gate for listing a resource category: the role must grant `read`.
pub fn can_list(principal: &Principal, resource: PermissionResource) -> bool {
	evaluate_grant(principal, resource, Action::List).is_allowed()
}

/// Same organization, `read` granted, and shared or owned.
pub fn can_read(principal: &Principal, facts: &OwnershipFacts) -> bool {
	evaluate(principal, Action::Read, facts).is_allowed()
}

/// Readable, `write` granted, and owned by the principal.
pub fn can_write(principal: &Principal, facts: &OwnershipFacts) -> bool {
	evaluate(principal, Action::Write, facts).is_allowed()
}

/// Readable, `delete` granted, and owned by the principal.
pub fn can_delete(principal: &Principal, facts: &OwnershipFacts) -> bool {
	evaluate(principal, Action::Delete, facts).is_allowed()
}
