// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types for widget operations.
//!
//! Enumerated fields are typed, so unknown values are rejected when the
//! transport deserializes the payload. Stored rows carry the same values as
//! plain strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vantage_server_auth::{UserId, WidgetId};
use vantage_server_db::{WidgetFilterRecord, WidgetRecord};

use crate::error::WidgetError;

macro_rules! string_enum {
	($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(rename_all = "snake_case")]
		pub enum $name {
			$($variant),+
		}

		impl $name {
			pub fn as_str(&self) -> &'static str {
				match self {
					$($name::$variant => $text),+
				}
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl FromStr for $name {
			type Err = WidgetError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($text => Ok($name::$variant),)+
					other => Err(WidgetError::InvalidInput(format!(
						concat!("unknown ", stringify!($name), " '{}'"),
						other
					))),
				}
			}
		}
	};
}

string_enum!(
	/// How a widget renders its value.
	DisplayType {
		Number => "number",
		Percentage => "percentage",
		Chart => "chart",
		Table => "table",
	}
);

string_enum!(
	/// Grid footprint of a widget.
	WidgetSize {
		Small => "small",
		Medium => "medium",
		Large => "large",
	}
);

string_enum!(
	FilterOperator {
		Equals => "equals",
		NotEquals => "not_equals",
		Contains => "contains",
		GreaterThan => "greater_than",
		LessThan => "less_than",
	}
);

/// A single filter clause applied to the widget's data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetFilter {
	pub field: String,
	pub operator: FilterOperator,
	#[serde(default)]
	pub value: String,
}

impl From<&WidgetFilter> for WidgetFilterRecord {
	fn from(filter: &WidgetFilter) -> Self {
		WidgetFilterRecord {
			field: filter.field.clone(),
			operator: filter.operator.as_str().to_string(),
			value: filter.value.clone(),
		}
	}
}

impl TryFrom<&WidgetFilterRecord> for WidgetFilter {
	type Error = WidgetError;

	fn try_from(record: &WidgetFilterRecord) -> Result<Self, Self::Error> {
		Ok(WidgetFilter {
			field: record.field.clone(),
			operator: record.operator.parse()?,
			value: record.value.clone(),
		})
	}
}

/// Payload for creating a widget. Only `name` and `data_source` are
/// required; the rest fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWidgetRequest {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub data_source: String,
	#[serde(default)]
	pub metric: Option<String>,
	#[serde(default)]
	pub display_type: Option<DisplayType>,
	#[serde(default)]
	pub show_change: Option<bool>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub size: Option<WidgetSize>,
	#[serde(default)]
	pub filters: Vec<WidgetFilter>,
	#[serde(default)]
	pub is_shared: bool,
}

/// Partial update. Absent fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateWidgetRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub data_source: Option<String>,
	#[serde(default)]
	pub metric: Option<String>,
	#[serde(default)]
	pub display_type: Option<DisplayType>,
	#[serde(default)]
	pub show_change: Option<bool>,
	#[serde(default)]
	pub color: Option<String>,
	#[serde(default)]
	pub size: Option<WidgetSize>,
	#[serde(default)]
	pub filters: Option<Vec<WidgetFilter>>,
	#[serde(default)]
	pub is_shared: Option<bool>,
}

/// New front-to-back order. Ids are raw strings so malformed ones surface as
/// invalid input rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderWidgetsRequest {
	pub widget_ids: Vec<String>,
}

/// A widget as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetResponse {
	pub id: WidgetId,
	pub user_id: Option<UserId>,
	pub name: String,
	pub description: String,
	pub data_source: String,
	pub metric: String,
	pub display_type: DisplayType,
	pub show_change: bool,
	pub color: String,
	pub size: WidgetSize,
	pub filters: Vec<WidgetFilter>,
	pub display_order: i64,
	pub is_shared: bool,
	pub is_default: bool,
	/// Whether the viewer owns this widget.
	pub is_owner: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl WidgetResponse {
	/// Build the view of `record` for `viewer` (`None` for system callers).
	///
	/// # Errors
	/// Returns `WidgetError::Internal` if the stored row holds a value outside
	/// the typed vocabulary.
	pub fn from_record(record: WidgetRecord, viewer: Option<UserId>) -> Result<Self, WidgetError> {
		let corrupt = |e: WidgetError| {
			WidgetError::Internal(format!("stored widget {} is malformed: {e}", record.id))
		};
		let display_type = record.display_type.parse().map_err(corrupt)?;
		let size = record.size.parse().map_err(corrupt)?;
		let filters = record
			.filters
			.iter()
			.map(WidgetFilter::try_from)
			.collect::<Result<Vec<_>, _>>()
			.map_err(corrupt)?;

		Ok(WidgetResponse {
			id: record.id,
			user_id: record.user_id,
			is_owner: viewer.is_some() && record.user_id == viewer,
			name: record.name,
			description: record.description,
			data_source: record.data_source,
			metric: record.metric,
			display_type,
			show_change: record.show_change,
			color: record.color,
			size,
			filters,
			display_order: record.display_order,
			is_shared: record.is_shared,
			is_default: record.is_default,
			created_at: record.created_at,
			updated_at: record.updated_at,
		})
	}
}
