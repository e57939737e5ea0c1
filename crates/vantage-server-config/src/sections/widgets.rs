// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard widget validation rules.

use serde::Deserialize;

/// Data sources a widget may query unless configured otherwise.
pub const DEFAULT_DATA_SOURCES: &[&str] =
	&["messages", "contacts", "campaigns", "transfers", "sessions"];

pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// Widget configuration (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetsConfig {
	pub allowed_data_sources: Vec<String>,
	pub max_name_length: usize,
}

impl Default for WidgetsConfig {
	fn default() -> Self {
		WidgetsConfigLayer::default().finalize()
	}
}

/// Widget configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetsConfigLayer {
	#[serde(default)]
	pub allowed_data_sources: Option<Vec<String>>,
	#[serde(default)]
	pub max_name_length: Option<usize>,
}

impl WidgetsConfigLayer {
	pub fn merge(&mut self, other: WidgetsConfigLayer) {
		if other.allowed_data_sources.is_some() {
			self.allowed_data_sources = other.allowed_data_sources;
		}
		if other.max_name_length.is_some() {
			self.max_name_length = other.max_name_length;
		}
	}

	pub fn finalize(self) -> WidgetsConfig {
		WidgetsConfig {
			allowed_data_sources: self.allowed_data_sources.unwrap_or_else(|| {
				DEFAULT_DATA_SOURCES
					.iter()
					.map(|s| s.to_string())
					.collect()
			}),
			max_name_length: self.max_name_length.unwrap_or(DEFAULT_MAX_NAME_LENGTH),
		}
	}
}
