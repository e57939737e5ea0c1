// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fetching a single widget.

use vantage_server_auth::WidgetId;
use vantage_server_widgets::{DisplayType, ErrorKind, WidgetError};

use super::support::{run_access_cases, AccessCase, Op, TestApp};

#[tokio::test]
async fn get_access_matrix() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();
	let shared = f.shared_widget.id.to_string();
	let private = f.private_widget.id.to_string();

	let cases = [
		AccessCase {
			name: "unauthenticated_cannot_get",
			op: Op::Get(shared.clone()),
			user: None,
			expected: Err(ErrorKind::Unauthenticated),
		},
		AccessCase {
			name: "user_without_role_cannot_get",
			op: Op::Get(shared.clone()),
			user: Some(f.org_a.outsider),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "owner_can_get_private",
			op: Op::Get(private.clone()),
			user: Some(f.org_a.owner),
			expected: Ok(()),
		},
		AccessCase {
			name: "viewer_can_get_shared",
			op: Op::Get(shared.clone()),
			user: Some(f.org_a.viewer),
			expected: Ok(()),
		},
		AccessCase {
			name: "member_cannot_get_private_of_colleague",
			op: Op::Get(private.clone()),
			user: Some(f.org_a.member),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "admin_cannot_get_private_of_colleague",
			op: Op::Get(private),
			user: Some(f.org_a.admin),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "unknown_id_is_not_found",
			op: Op::Get(WidgetId::generate().to_string()),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::NotFound),
		},
		AccessCase {
			name: "malformed_id_is_invalid",
			op: Op::Get("invalid-uuid".to_string()),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "foreign_widget_is_not_found",
			op: Op::Get(f.foreign_widget.id.to_string()),
			user: Some(f.org_a.admin),
			expected: Err(ErrorKind::NotFound),
		},
	];
	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn get_returns_full_widget() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let widget = app
		.service
		.get(&f.org_a.owner.ctx(), &f.shared_widget.id.to_string())
		.await
		.unwrap();
	assert_eq!(widget.id, f.shared_widget.id);
	assert_eq!(widget.name, "Shared Widget");
	assert_eq!(widget.data_source, "messages");
	assert_eq!(widget.display_type, DisplayType::Number);
	assert!(widget.is_owner);
	assert!(widget.is_shared);
}

#[tokio::test]
async fn checks_run_in_fixed_order() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let cases = [
		// Missing identity wins over a malformed id.
		AccessCase {
			name: "unauthenticated_before_invalid_id",
			op: Op::Get("not-a-uuid".to_string()),
			user: None,
			expected: Err(ErrorKind::Unauthenticated),
		},
		// Missing grant wins over a malformed id.
		AccessCase {
			name: "forbidden_before_invalid_id",
			op: Op::Get("not-a-uuid".to_string()),
			user: Some(f.org_a.outsider),
			expected: Err(ErrorKind::Forbidden),
		},
		// Missing grant wins over a missing widget.
		AccessCase {
			name: "forbidden_before_not_found",
			op: Op::Get(WidgetId::generate().to_string()),
			user: Some(f.org_a.outsider),
			expected: Err(ErrorKind::Forbidden),
		},
	];
	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn malformed_id_reports_offending_value() {
	let app = TestApp::new().await;
	let err = app
		.service
		.get(&app.fixtures.org_a.owner.ctx(), "invalid-uuid")
		.await
		.unwrap_err();
	assert!(matches!(err, WidgetError::InvalidId(ref raw) if raw == "invalid-uuid"));
}
