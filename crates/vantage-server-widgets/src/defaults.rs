// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Starter dashboard for new organizations.
//!
//! Default widgets have no owner, are shared with the whole organization and
//! are flagged `is_default`. Without `analytics:manage` nobody can modify
//! them.

use vantage_server_auth::{OrgId, WidgetId};
use vantage_server_db::NewWidgetRecord;

use crate::types::{DisplayType, WidgetSize};
use crate::validation::WidgetRules;

struct DefaultWidget {
	name: &'static str,
	description: &'static str,
	data_source: &'static str,
	color: &'static str,
}

const DEFAULT_WIDGETS: &[DefaultWidget] = &[
	DefaultWidget {
		name: "Total Messages",
		description: "Messages sent and received",
		data_source: "messages",
		color: "blue",
	},
	DefaultWidget {
		name: "Total Contacts",
		description: "Contacts in the organization",
		data_source: "contacts",
		color: "green",
	},
	DefaultWidget {
		name: "Active Sessions",
		description: "Conversations currently open",
		data_source: "sessions",
		color: "purple",
	},
	DefaultWidget {
		name: "Campaigns Sent",
		description: "Campaigns delivered",
		data_source: "campaigns",
		color: "orange",
	},
	DefaultWidget {
		name: "Pending Transfers",
		description: "Conversations waiting for an agent",
		data_source: "transfers",
		color: "red",
	},
];

/// Records for the starter dashboard of `org_id`, skipping data sources the
/// rules do not allow.
pub fn default_widgets(org_id: OrgId, rules: &WidgetRules) -> Vec<NewWidgetRecord> {
	DEFAULT_WIDGETS
		.iter()
		.filter(|w| rules.allows_data_source(w.data_source))
		.map(|w| NewWidgetRecord {
			id: WidgetId::generate(),
			org_id,
			user_id: None,
			name: w.name.to_string(),
			description: w.description.to_string(),
			data_source: w.data_source.to_string(),
			metric: "count".to_string(),
			display_type: DisplayType::Number.as_str().to_string(),
			show_change: true,
			color: w.color.to_string(),
			size: WidgetSize::Small.as_str().to_string(),
			filters: Vec::new(),
			is_shared: true,
			is_default: true,
		})
		.collect()
}
