// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Creating widgets.

use serde_json::json;
use vantage_server_widgets::{
	CreateWidgetRequest, DisplayType, ErrorKind, FilterOperator, WidgetFilter, WidgetSize,
};

use super::support::{run_access_cases, AccessCase, Op, TestApp};

#[tokio::test]
async fn create_access_matrix() {
	let app = TestApp::new().await;
	let org = app.fixtures.org_a;
	let body = json!({"name": "New Widget", "data_source": "messages"});

	let cases = [
		AccessCase {
			name: "unauthenticated_cannot_create",
			op: Op::Create(body.clone()),
			user: None,
			expected: Err(ErrorKind::Unauthenticated),
		},
		AccessCase {
			name: "read_only_cannot_create",
			op: Op::Create(body.clone()),
			user: Some(org.viewer),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "user_without_role_cannot_create",
			op: Op::Create(body.clone()),
			user: Some(org.outsider),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "editor_can_create",
			op: Op::Create(body.clone()),
			user: Some(org.editor),
			expected: Ok(()),
		},
		AccessCase {
			name: "owner_can_create",
			op: Op::Create(body),
			user: Some(org.owner),
			expected: Ok(()),
		},
	];
	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn create_applies_defaults_and_owner() {
	let app = TestApp::new().await;
	let owner = app.fixtures.org_a.owner;

	let req = CreateWidgetRequest {
		name: "New Widget".to_string(),
		description: "Test description".to_string(),
		data_source: "messages".to_string(),
		..Default::default()
	};
	let widget = app.service.create(&owner.ctx(), req).await.unwrap();

	assert_eq!(widget.name, "New Widget");
	assert_eq!(widget.description, "Test description");
	assert_eq!(widget.metric, "count");
	assert_eq!(widget.display_type, DisplayType::Number);
	assert_eq!(widget.color, "blue");
	assert_eq!(widget.size, WidgetSize::Small);
	assert!(widget.show_change);
	assert!(!widget.is_shared);
	assert!(!widget.is_default);
	assert_eq!(widget.user_id, Some(owner.user_id));
	assert!(widget.is_owner);
	assert_eq!(app.row_count(widget.id).await, 1);
}

#[tokio::test]
async fn create_appends_after_last_widget() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let widget = app.create_widget(&f.org_a.member, "Appended", true).await;
	assert_eq!(widget.display_order, f.private_widget.display_order + 1);

	let first_in_new_org = {
		let org = app.add_org("org-first").await;
		app.create_widget(&org.owner, "First", false).await
	};
	assert_eq!(first_in_new_org.display_order, 0);
}

#[tokio::test]
async fn create_with_filters_and_explicit_fields() {
	let app = TestApp::new().await;
	let owner = app.fixtures.org_a.owner;
	let body = json!({
		"name": "Inbound Messages",
		"data_source": "messages",
		"metric": "sum",
		"display_type": "chart",
		"show_change": false,
		"color": "green",
		"size": "large",
		"is_shared": true,
		"filters": [
			{"field": "direction", "operator": "equals", "value": "inbound"},
			{"field": "status", "operator": "not_equals", "value": "failed"}
		]
	});
	let req: CreateWidgetRequest = serde_json::from_value(body).unwrap();

	let widget = app.service.create(&owner.ctx(), req).await.unwrap();
	assert_eq!(widget.metric, "sum");
	assert_eq!(widget.display_type, DisplayType::Chart);
	assert!(!widget.show_change);
	assert_eq!(widget.size, WidgetSize::Large);
	assert!(widget.is_shared);
	assert_eq!(
		widget.filters,
		vec![
			WidgetFilter {
				field: "direction".to_string(),
				operator: FilterOperator::Equals,
				value: "inbound".to_string(),
			},
			WidgetFilter {
				field: "status".to_string(),
				operator: FilterOperator::NotEquals,
				value: "failed".to_string(),
			},
		]
	);

	let fetched = app
		.service
		.get(&owner.ctx(), &widget.id.to_string())
		.await
		.unwrap();
	assert_eq!(fetched.filters, widget.filters);
}

#[tokio::test]
async fn create_validates_payload() {
	let app = TestApp::new().await;
	let owner = app.fixtures.org_a.owner;
	let long_name = "x".repeat(101);

	let cases = [
		AccessCase {
			name: "invalid_data_source",
			op: Op::Create(json!({"name": "Widget", "data_source": "invalid_source"})),
			user: Some(owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "missing_name",
			op: Op::Create(json!({"data_source": "messages"})),
			user: Some(owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "blank_name",
			op: Op::Create(json!({"name": "   ", "data_source": "messages"})),
			user: Some(owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "name_too_long",
			op: Op::Create(json!({"name": long_name, "data_source": "messages"})),
			user: Some(owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "missing_data_source",
			op: Op::Create(json!({"name": "Widget"})),
			user: Some(owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "filter_without_field",
			op: Op::Create(json!({
				"name": "Widget",
				"data_source": "messages",
				"filters": [{"field": "", "operator": "equals", "value": "x"}]
			})),
			user: Some(owner),
			expected: Err(ErrorKind::InvalidInput),
		},
	];
	run_access_cases(&app, &cases).await;

	let widgets = app.service.list(&owner.ctx()).await.unwrap();
	assert_eq!(widgets.len(), 2, "rejected creates must not persist");
}

#[tokio::test]
async fn missing_grant_is_reported_before_invalid_payload() {
	let app = TestApp::new().await;
	let cases = [
		AccessCase {
			name: "viewer_with_invalid_payload",
			op: Op::Create(json!({"name": "", "data_source": "invalid_source"})),
			user: Some(app.fixtures.org_a.viewer),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "anonymous_with_invalid_payload",
			op: Op::Create(json!({"name": "", "data_source": "invalid_source"})),
			user: None,
			expected: Err(ErrorKind::Unauthenticated),
		},
	];
	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn name_is_stored_trimmed() {
	let app = TestApp::new().await;
	let owner = app.fixtures.org_a.owner;
	let req = CreateWidgetRequest {
		name: "  Padded  ".to_string(),
		data_source: "contacts".to_string(),
		..Default::default()
	};

	let widget = app.service.create(&owner.ctx(), req).await.unwrap();
	assert_eq!(widget.name, "Padded");
}
