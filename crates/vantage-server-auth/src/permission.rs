// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Coarse-grained permission model.
//!
//! A [`Permission`] is a `(resource, action)` pair drawn from two closed enums,
//! so every match over the permission matrix is checked for exhaustiveness at
//! compile time. The textual form `resource:action` (e.g. `analytics:read`)
//! is only used at the storage and configuration edges.
//!
//! The [`PermissionCatalog`] is the set of grantable permissions. It is built
//! once at startup from an explicit template (see
//! [`DEFAULT_PERMISSION_TEMPLATE`]) and flattens role grants into a
//! [`PermissionSet`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

// =============================================================================
// Resource categories
// =============================================================================

/// Resource categories that permissions are granted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionResource {
	/// Dashboards and their widgets.
	Analytics,
	Contacts,
	Messages,
	Templates,
	Campaigns,
	Chatbot,
	Settings,
	Users,
}

impl PermissionResource {
	/// Returns all resource categories.
	pub fn all() -> &'static [PermissionResource] {
		&[
			PermissionResource::Analytics,
			PermissionResource::Contacts,
			PermissionResource::Messages,
			PermissionResource::Templates,
			PermissionResource::Campaigns,
			PermissionResource::Chatbot,
			PermissionResource::Settings,
			PermissionResource::Users,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			PermissionResource::Analytics => "analytics",
			PermissionResource::Contacts => "contacts",
			PermissionResource::Messages => "messages",
			PermissionResource::Templates => "templates",
			PermissionResource::Campaigns => "campaigns",
			PermissionResource::Chatbot => "chatbot",
			PermissionResource::Settings => "settings",
			PermissionResource::Users => "users",
		}
	}
}

impl fmt::Display for PermissionResource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PermissionResource {
	type Err = AuthError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		PermissionResource::all()
			.iter()
			.copied()
			.find(|r| r.as_str() == s)
			.ok_or_else(|| AuthError::UnknownResource(s.to_string()))
	}
}

// =============================================================================
// Actions
// =============================================================================

/// Actions a permission can grant on a resource category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
	Read,
	Write,
	Delete,
	/// Privileged override for ownerless (system default) resources. Never
	/// grants access to a resource that has an owner.
	Manage,
}

impl PermissionAction {
	/// Returns all actions.
	pub fn all() -> &'static [PermissionAction] {
		&[
			PermissionAction::Read,
			PermissionAction::Write,
			PermissionAction::Delete,
			PermissionAction::Manage,
		]
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			PermissionAction::Read => "read",
			PermissionAction::Write => "write",
			PermissionAction::Delete => "delete",
			PermissionAction::Manage => "manage",
		}
	}
}

impl fmt::Display for PermissionAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PermissionAction {
	type Err = AuthError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		PermissionAction::all()
			.iter()
			.copied()
			.find(|a| a.as_str() == s)
			.ok_or_else(|| AuthError::UnknownAction(s.to_string()))
	}
}

// =============================================================================
// Permission
// =============================================================================

/// A single coarse-grained grant: an action on a resource category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
	pub resource: PermissionResource,
	pub action: PermissionAction,
}

impl Permission {
	pub const fn new(resource: PermissionResource, action: PermissionAction) -> Self {
		Self { resource, action }
	}

	/// Parses the storage representation (separate resource and action columns).
	pub fn from_parts(resource: &str, action: &str) -> Result<Self, AuthError> {
		Ok(Self {
			resource: resource.parse()?,
			action: action.parse()?,
		})
	}
}

impl fmt::Display for Permission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.resource, self.action)
	}
}

impl FromStr for Permission {
	type Err = AuthError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (resource, action) = s
			.trim()
			.split_once(':')
			.ok_or_else(|| AuthError::MalformedPermission(s.to_string()))?;
		Self::from_parts(resource, action)
	}
}

// =============================================================================
// Permission set
// =============================================================================

/// An effective grant set. Duplicate grants collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, permission: &Permission) -> bool {
		self.0.contains(permission)
	}

	/// Returns true if the set grants `action` on `resource`.
	pub fn allows(&self, resource: PermissionResource, action: PermissionAction) -> bool {
		self.contains(&Permission::new(resource, action))
	}

	/// Inserts a grant, returning false if it was already present.
	pub fn insert(&mut self, permission: Permission) -> bool {
		self.0.insert(permission)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Permission> {
		self.0.iter()
	}
}

impl FromIterator<Permission> for PermissionSet {
	fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

// =============================================================================
// Catalog
// =============================================================================

/// Built-in permission template: `read`, `write`, `delete` for every resource
/// category, plus the `manage` override for analytics.
pub const DEFAULT_PERMISSION_TEMPLATE: &[Permission] = &[
	Permission::new(PermissionResource::Analytics, PermissionAction::Read),
	Permission::new(PermissionResource::Analytics, PermissionAction::Write),
	Permission::new(PermissionResource::Analytics, PermissionAction::Delete),
	Permission::new(PermissionResource::Analytics, PermissionAction::Manage),
	Permission::new(PermissionResource::Contacts, PermissionAction::Read),
	Permission::new(PermissionResource::Contacts, PermissionAction::Write),
	Permission::new(PermissionResource::Contacts, PermissionAction::Delete),
	Permission::new(PermissionResource::Messages, PermissionAction::Read),
	Permission::new(PermissionResource::Messages, PermissionAction::Write),
	Permission::new(PermissionResource::Messages, PermissionAction::Delete),
	Permission::new(PermissionResource::Templates, PermissionAction::Read),
	Permission::new(PermissionResource::Templates, PermissionAction::Write),
	Permission::new(PermissionResource::Templates, PermissionAction::Delete),
	Permission::new(PermissionResource::Campaigns, PermissionAction::Read),
	Permission::new(PermissionResource::Campaigns, PermissionAction::Write),
	Permission::new(PermissionResource::Campaigns, PermissionAction::Delete),
	Permission::new(PermissionResource::Chatbot, PermissionAction::Read),
	Permission::new(PermissionResource::Chatbot, PermissionAction::Write),
	Permission::new(PermissionResource::Chatbot, PermissionAction::Delete),
	Permission::new(PermissionResource::Settings, PermissionAction::Read),
	Permission::new(PermissionResource::Settings, PermissionAction::Write),
	Permission::new(PermissionResource::Settings, PermissionAction::Delete),
	Permission::new(PermissionResource::Users, PermissionAction::Read),
	Permission::new(PermissionResource::Users, PermissionAction::Write),
	Permission::new(PermissionResource::Users, PermissionAction::Delete),
];

/// The set of grantable permissions, in template order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionCatalog {
	ordered: Vec<Permission>,
	index: PermissionSet,
}

impl PermissionCatalog {
	/// Builds a catalog from `resource:action` strings. Duplicates collapse,
	/// keeping the first occurrence's position.
	pub fn from_template<S: AsRef<str>>(template: &[S]) -> Result<Self, AuthError> {
		let mut ordered = Vec::with_capacity(template.len());
		let mut index = PermissionSet::new();
		for entry in template {
			let permission: Permission = entry.as_ref().parse()?;
			if index.insert(permission) {
				ordered.push(permission);
			}
		}

		if ordered.is_empty() {
			return Err(AuthError::EmptyCatalog);
		}

		tracing::debug!(count = ordered.len(), "permission catalog built");
		Ok(Self { ordered, index })
	}

	/// Catalog built from [`DEFAULT_PERMISSION_TEMPLATE`].
	pub fn builtin() -> Self {
		let ordered = DEFAULT_PERMISSION_TEMPLATE.to_vec();
		let index = ordered.iter().copied().collect();
		Self { ordered, index }
	}

	pub fn permissions(&self) -> &[Permission] {
		&self.ordered
	}

	pub fn contains(&self, permission: &Permission) -> bool {
		self.index.contains(permission)
	}

	/// Permissions on one resource category, in template order.
	pub fn for_resource(&self, resource: PermissionResource) -> Vec<Permission> {
		self
			.ordered
			.iter()
			.copied()
			.filter(|p| p.resource == resource)
			.collect()
	}

	/// Flattens role grants into an effective set, dropping grants the catalog
	/// does not know about.
	pub fn resolve_grants<I>(&self, grants: I) -> PermissionSet
	where
		I: IntoIterator<Item = Permission>,
	{
		grants
			.into_iter()
			.filter(|grant| {
				let known = self.contains(grant);
				if !known {
					tracing::warn!(permission = %grant, "dropping grant outside permission catalog");
				}
				known
			})
			.collect()
	}
}

impl Default for PermissionCatalog {
	fn default() -> Self {
		Self::builtin()
	}
}
