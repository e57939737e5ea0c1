// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deleting widgets. Owner only; sharing is irrelevant.

use vantage_server_auth::{DenyReason, WidgetId};
use vantage_server_widgets::{ErrorKind, WidgetError};

use super::support::{run_access_cases, AccessCase, Op, TestApp};

#[tokio::test]
async fn delete_access_matrix() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();
	let shared = f.shared_widget.id.to_string();

	let cases = [
		AccessCase {
			name: "unauthenticated_cannot_delete",
			op: Op::Delete(shared.clone()),
			user: None,
			expected: Err(ErrorKind::Unauthenticated),
		},
		AccessCase {
			name: "read_only_cannot_delete",
			op: Op::Delete(shared.clone()),
			user: Some(f.org_a.viewer),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "editor_without_delete_grant_cannot_delete",
			op: Op::Delete(shared.clone()),
			user: Some(f.org_a.editor),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "colleague_cannot_delete_shared",
			op: Op::Delete(shared.clone()),
			user: Some(f.org_a.member),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "unknown_id_is_not_found",
			op: Op::Delete(WidgetId::generate().to_string()),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::NotFound),
		},
		AccessCase {
			name: "malformed_id_is_invalid",
			op: Op::Delete("invalid-uuid".to_string()),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "owner_can_delete",
			op: Op::Delete(shared.clone()),
			user: Some(f.org_a.owner),
			expected: Ok(()),
		},
		AccessCase {
			name: "second_delete_is_not_found",
			op: Op::Delete(shared),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::NotFound),
		},
	];
	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn non_owner_attempt_leaves_row_then_owner_removes_it() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let id = f.shared_widget.id;

	let err = app
		.service
		.delete(&f.org_a.member.ctx(), &id.to_string())
		.await
		.unwrap_err();
	assert!(matches!(err, WidgetError::Forbidden(DenyReason::NotOwner)));
	assert_eq!(app.row_count(id).await, 1);

	app
		.service
		.delete(&f.org_a.owner.ctx(), &id.to_string())
		.await
		.unwrap();
	assert_eq!(app.row_count(id).await, 0);
}

#[tokio::test]
async fn own_widget_still_needs_delete_grant() {
	let app = TestApp::new().await;
	let editor = app.fixtures.org_a.editor;
	let widget = app.create_widget(&editor, "Editor Widget", false).await;

	let err = app
		.service
		.delete(&editor.ctx(), &widget.id.to_string())
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		WidgetError::Forbidden(DenyReason::MissingGrant(_))
	));
	assert_eq!(app.row_count(widget.id).await, 1);
}

#[tokio::test]
async fn ownerless_widget_is_deletable_only_with_manage() {
	let app = TestApp::new().await;
	let org = app.fixtures.org_a;
	let system = app.create_ownerless_widget(org.org_id, "Pending Transfers").await;
	let id = system.id.to_string();

	let err = app.service.delete(&org.owner.ctx(), &id).await.unwrap_err();
	assert!(matches!(err, WidgetError::Forbidden(DenyReason::Ownerless)));

	app.service.delete(&org.admin.ctx(), &id).await.unwrap();
	assert_eq!(app.row_count(system.id).await, 0);
}

#[tokio::test]
async fn deleting_does_not_renumber_others() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let before = app.display_orders(f.org_a.org_id).await;

	app
		.service
		.delete(&f.org_a.owner.ctx(), &f.shared_widget.id.to_string())
		.await
		.unwrap();

	let after = app.display_orders(f.org_a.org_id).await;
	assert_eq!(after, vec![before[1]]);
}
