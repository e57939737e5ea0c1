// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization core for Vantage.
//!
//! This crate owns the permission model and the decision logic that every
//! tenant-scoped operation goes through:
//!
//! - [`permission`]: closed `resource:action` permissions and the
//!   [`PermissionCatalog`] built from configuration
//! - [`principal`]: [`AuthContext`] as delivered by the identity layer, and
//!   the immutable per-request [`Principal`]
//! - [`abac`]: the engine deciding list/read/write/delete from grants, tenant
//!   and ownership facts
//!
//! Nothing here performs I/O. Stores live in `vantage-server-db`.

pub mod abac;
pub mod error;
pub mod permission;
pub mod principal;
pub mod types;

pub use abac::{
	can_delete, can_list, can_read, can_write, evaluate, evaluate_grant, Action, Decision, DenyReason,
	OwnershipFacts,
};
pub use error::AuthError;
pub use permission::{
	Permission, PermissionAction, PermissionCatalog, PermissionResource, PermissionSet,
	DEFAULT_PERMISSION_TEMPLATE,
};
pub use principal::{AuthContext, Principal};
pub use types::{OrgId, RoleId, UserId, WidgetId};
