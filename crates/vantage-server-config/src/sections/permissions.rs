// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Permission catalog template.
//!
//! The template is the full list of grantable `resource:action` permissions.
//! It is passed explicitly into the catalog at startup instead of living as
//! global state.

use serde::Deserialize;
use vantage_server_auth::{AuthError, PermissionCatalog, DEFAULT_PERMISSION_TEMPLATE};

/// Permissions configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct PermissionsConfig {
	pub template: Vec<String>,
}

impl Default for PermissionsConfig {
	fn default() -> Self {
		Self {
			template: default_template(),
		}
	}
}

impl PermissionsConfig {
	/// Build the catalog described by this template.
	pub fn catalog(&self) -> Result<PermissionCatalog, AuthError> {
		PermissionCatalog::from_template(&self.template)
	}
}

fn default_template() -> Vec<String> {
	DEFAULT_PERMISSION_TEMPLATE
		.iter()
		.map(|p| p.to_string())
		.collect()
}

/// Permissions configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PermissionsConfigLayer {
	#[serde(default)]
	pub template: Option<Vec<String>>,
}

impl PermissionsConfigLayer {
	pub fn merge(&mut self, other: PermissionsConfigLayer) {
		if other.template.is_some() {
			self.template = other.template;
		}
	}

	pub fn finalize(self) -> PermissionsConfig {
		PermissionsConfig {
			template: self.template.unwrap_or_else(default_template),
		}
	}
}
