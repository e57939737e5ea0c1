// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reordering widgets.
//!
//! - Needs `analytics:write` only; ownership of the listed widgets is not
//!   checked
//! - All listed widgets move or none does

use vantage_server_auth::WidgetId;
use vantage_server_widgets::{ErrorKind, ReorderWidgetsRequest, WidgetResponse};

use super::support::{run_access_cases, AccessCase, Op, OrgFixture, TestApp};

fn id_strings(widgets: &[&WidgetResponse]) -> Vec<String> {
	widgets.iter().map(|w| w.id.to_string()).collect()
}

async fn three_widgets(app: &TestApp, slug: &str) -> (OrgFixture, [WidgetResponse; 3]) {
	let org = app.add_org(slug).await;
	let w1 = app.create_widget(&org.owner, "Widget 1", true).await;
	let w2 = app.create_widget(&org.owner, "Widget 2", true).await;
	let w3 = app.create_widget(&org.owner, "Widget 3", true).await;
	(org, [w1, w2, w3])
}

#[tokio::test]
async fn reorder_access_matrix() {
	let app = TestApp::new().await;
	let f = app.fixtures.clone();
	let ids = id_strings(&[&f.private_widget, &f.shared_widget]);

	let cases = [
		AccessCase {
			name: "unauthenticated_cannot_reorder",
			op: Op::Reorder(vec![WidgetId::generate().to_string()]),
			user: None,
			expected: Err(ErrorKind::Unauthenticated),
		},
		AccessCase {
			name: "read_only_cannot_reorder",
			op: Op::Reorder(ids.clone()),
			user: Some(f.org_a.viewer),
			expected: Err(ErrorKind::Forbidden),
		},
		AccessCase {
			name: "empty_sequence_is_invalid",
			op: Op::Reorder(Vec::new()),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "malformed_id_is_invalid",
			op: Op::Reorder(vec![f.shared_widget.id.to_string(), "invalid-uuid".to_string()]),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "duplicate_id_is_invalid",
			op: Op::Reorder(id_strings(&[&f.shared_widget, &f.shared_widget])),
			user: Some(f.org_a.owner),
			expected: Err(ErrorKind::InvalidInput),
		},
		AccessCase {
			name: "editor_can_reorder",
			op: Op::Reorder(ids.clone()),
			user: Some(f.org_a.editor),
			expected: Ok(()),
		},
		AccessCase {
			name: "owner_can_reorder",
			op: Op::Reorder(ids),
			user: Some(f.org_a.owner),
			expected: Ok(()),
		},
	];
	run_access_cases(&app, &cases).await;
}

#[tokio::test]
async fn reorder_sets_new_sequence() {
	let app = TestApp::new().await;
	let (org, [w1, w2, w3]) = three_widgets(&app, "org-reorder").await;

	app
		.service
		.reorder(
			&org.owner.ctx(),
			ReorderWidgetsRequest {
				widget_ids: id_strings(&[&w3, &w1, &w2]),
			},
		)
		.await
		.unwrap();

	assert_eq!(
		app.display_orders(org.org_id).await,
		vec![(w3.id, 0), (w1.id, 1), (w2.id, 2)]
	);
}

#[tokio::test]
async fn reorder_is_idempotent() {
	let app = TestApp::new().await;
	let (org, [w1, w2, w3]) = three_widgets(&app, "org-idempotent").await;
	let req = ReorderWidgetsRequest {
		widget_ids: id_strings(&[&w2, &w3, &w1]),
	};

	app.service.reorder(&org.owner.ctx(), req.clone()).await.unwrap();
	let once = app.display_orders(org.org_id).await;
	app.service.reorder(&org.owner.ctx(), req).await.unwrap();
	let twice = app.display_orders(org.org_id).await;

	assert_eq!(once, twice);
}

#[tokio::test]
async fn foreign_id_aborts_whole_reorder() {
	let app = TestApp::new().await;
	let (org, [w1, w2, w3]) = three_widgets(&app, "org-atomic").await;
	let before = app.display_orders(org.org_id).await;

	let mut ids = id_strings(&[&w3, &w2]);
	ids.push(app.fixtures.foreign_widget.id.to_string());
	ids.push(w1.id.to_string());

	let err = app
		.service
		.reorder(&org.owner.ctx(), ReorderWidgetsRequest { widget_ids: ids })
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert_eq!(app.display_orders(org.org_id).await, before);

	// The foreign organization is untouched as well.
	let foreign = app
		.display_orders(app.fixtures.org_b.org_id)
		.await;
	assert_eq!(foreign, vec![(app.fixtures.foreign_widget.id, 0)]);
}

#[tokio::test]
async fn unknown_id_aborts_whole_reorder() {
	let app = TestApp::new().await;
	let (org, [w1, w2, w3]) = three_widgets(&app, "org-unknown").await;
	let before = app.display_orders(org.org_id).await;

	let mut ids = id_strings(&[&w3, &w2, &w1]);
	ids.push(WidgetId::generate().to_string());

	let err = app
		.service
		.reorder(&org.owner.ctx(), ReorderWidgetsRequest { widget_ids: ids })
		.await
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::NotFound);
	assert_eq!(app.display_orders(org.org_id).await, before);
}

#[tokio::test]
async fn subset_leaves_unlisted_widgets_alone() {
	let app = TestApp::new().await;
	let (org, [w1, w2, w3]) = three_widgets(&app, "org-subset").await;

	app
		.service
		.reorder(
			&org.owner.ctx(),
			ReorderWidgetsRequest {
				widget_ids: id_strings(&[&w3, &w2]),
			},
		)
		.await
		.unwrap();

	let orders = app.display_orders(org.org_id).await;
	assert!(orders.contains(&(w3.id, 0)));
	assert!(orders.contains(&(w2.id, 1)));
	assert!(orders.contains(&(w1.id, 0)));
}

#[tokio::test]
async fn colleague_with_write_may_reorder_others_widgets() {
	let app = TestApp::new().await;
	let (org, [w1, w2, w3]) = three_widgets(&app, "org-colleague").await;

	app
		.service
		.reorder(
			&org.member.ctx(),
			ReorderWidgetsRequest {
				widget_ids: id_strings(&[&w2, &w1, &w3]),
			},
		)
		.await
		.unwrap();

	assert_eq!(
		app.ordered_ids(org.org_id).await,
		vec![w2.id, w1.id, w3.id]
	);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reorders_never_interleave() {
	let app = TestApp::with_file_db().await;
	let org = app.add_org("org-concurrent").await;
	let mut widgets = Vec::new();
	for i in 0..6 {
		widgets.push(app.create_widget(&org.owner, &format!("Widget {i}"), true).await);
	}

	let sequences: Vec<Vec<String>> = (0..widgets.len())
		.map(|shift| {
			let mut ids: Vec<String> = widgets.iter().map(|w| w.id.to_string()).collect();
			ids.rotate_left(shift);
			ids
		})
		.collect();

	let mut handles = Vec::new();
	for sequence in sequences.clone() {
		let service = app.service.clone();
		let ctx = org.owner.ctx();
		handles.push(tokio::spawn(async move {
			service
				.reorder(&ctx, ReorderWidgetsRequest { widget_ids: sequence })
				.await
		}));
	}
	for handle in handles {
		handle.await.unwrap().unwrap();
	}

	let orders = app.display_orders(org.org_id).await;
	let positions: Vec<i64> = orders.iter().map(|(_, order)| *order).collect();
	assert_eq!(positions, (0..widgets.len() as i64).collect::<Vec<_>>());

	let final_sequence: Vec<String> = orders.iter().map(|(id, _)| id.to_string()).collect();
	assert!(
		sequences.contains(&final_sequence),
		"final order must be exactly one of the submitted sequences"
	);
}
