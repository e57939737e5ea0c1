// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input validation for widget operations.

use std::collections::HashSet;
use vantage_server_auth::WidgetId;
use vantage_server_config::WidgetsConfig;

use crate::error::{Result, WidgetError};
use crate::types::WidgetFilter;

/// Parses a widget id from its string form.
pub fn parse_widget_id(raw: &str) -> Result<WidgetId> {
	raw
		.trim()
		.parse()
		.map_err(|_| WidgetError::InvalidId(raw.to_string()))
}

/// Parses a reorder sequence. Rejects an empty sequence, malformed ids and
/// repeated ids.
pub fn parse_widget_ids(raw: &[String]) -> Result<Vec<WidgetId>> {
	if raw.is_empty() {
		return Err(WidgetError::InvalidInput(
			"widget_ids must not be empty".to_string(),
		));
	}

	let mut seen = HashSet::with_capacity(raw.len());
	let mut ids = Vec::with_capacity(raw.len());
	for value in raw {
		let id = parse_widget_id(value)?;
		if !seen.insert(id) {
			return Err(WidgetError::InvalidInput(format!(
				"widget {id} appears more than once"
			)));
		}
		ids.push(id);
	}
	Ok(ids)
}

/// Domain rules applied to widget payloads after authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetRules {
	allowed_data_sources: Vec<String>,
	max_name_length: usize,
}

impl WidgetRules {
	pub fn new(allowed_data_sources: Vec<String>, max_name_length: usize) -> Self {
		Self {
			allowed_data_sources,
			max_name_length,
		}
	}

	pub fn allowed_data_sources(&self) -> &[String] {
		&self.allowed_data_sources
	}

	pub fn allows_data_source(&self, data_source: &str) -> bool {
		self.allowed_data_sources.iter().any(|s| s == data_source)
	}

	/// Returns the trimmed name.
	pub fn validate_name(&self, name: &str) -> Result<String> {
		let trimmed = name.trim();
		if trimmed.is_empty() {
			return Err(WidgetError::InvalidInput("name is required".to_string()));
		}
		if trimmed.chars().count() > self.max_name_length {
			return Err(WidgetError::InvalidInput(format!(
				"name must be at most {} characters",
				self.max_name_length
			)));
		}
		Ok(trimmed.to_string())
	}

	pub fn validate_data_source(&self, data_source: &str) -> Result<()> {
		if data_source.is_empty() {
			return Err(WidgetError::InvalidInput(
				"data_source is required".to_string(),
			));
		}
		if !self.allows_data_source(data_source) {
			return Err(WidgetError::InvalidInput(format!(
				"unsupported data_source '{data_source}'"
			)));
		}
		Ok(())
	}

	pub fn validate_filters(&self, filters: &[WidgetFilter]) -> Result<()> {
		if let Some(position) = filters.iter().position(|f| f.field.trim().is_empty()) {
			return Err(WidgetError::InvalidInput(format!(
				"filter {position} has an empty field"
			)));
		}
		Ok(())
	}
}

impl From<&WidgetsConfig> for WidgetRules {
	fn from(config: &WidgetsConfig) -> Self {
		Self::new(config.allowed_data_sources.clone(), config.max_name_length)
	}
}

impl Default for WidgetRules {
	fn default() -> Self {
		Self::from(&WidgetsConfig::default())
	}
}
