// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;
use tempfile::TempDir;
use vantage_server_auth::{
	AuthContext, OrgId, Permission, PermissionAction, PermissionCatalog, PermissionResource,
	RoleId, UserId, WidgetId,
};
use vantage_server_db::testing::create_test_pool;
use vantage_server_db::{
	create_pool, ensure_schema, NewWidgetRecord, RoleRepository, WidgetRecord, WidgetRepository,
};
use vantage_server_widgets::{
	CreateWidgetRequest, ErrorKind, ReorderWidgetsRequest, UpdateWidgetRequest, WidgetResponse,
	WidgetRules, WidgetService,
};

fn analytics(actions: &[PermissionAction]) -> Vec<Permission> {
	actions
		.iter()
		.map(|&a| Permission::new(PermissionResource::Analytics, a))
		.collect()
}

#[derive(Debug, Clone, Copy)]
pub struct TestUser {
	pub org_id: OrgId,
	pub user_id: UserId,
}

impl TestUser {
	pub fn ctx(&self) -> AuthContext {
		AuthContext::authenticated(self.org_id, self.user_id)
	}
}

/// Members of one organization, one per role shape.
#[derive(Debug, Clone, Copy)]
pub struct OrgFixture {
	pub org_id: OrgId,
	/// Every permission in the catalog, including `analytics:manage`.
	pub admin: TestUser,
	/// `analytics:read`, `write`, `delete`. Owns the fixture widgets.
	pub owner: TestUser,
	/// Same role as `owner`.
	pub member: TestUser,
	/// `analytics:read` and `analytics:write`.
	pub editor: TestUser,
	/// `analytics:read` only.
	pub viewer: TestUser,
	/// No role at all.
	pub outsider: TestUser,
}

#[derive(Debug, Clone)]
pub struct Fixtures {
	pub org_a: OrgFixture,
	pub org_b: OrgFixture,
	/// Shared widget of `org_a.owner`.
	pub shared_widget: WidgetResponse,
	/// Private widget of `org_a.owner`.
	pub private_widget: WidgetResponse,
	/// Shared widget of `org_b.owner`.
	pub foreign_widget: WidgetResponse,
}

pub struct TestApp {
	pub service: WidgetService,
	pub roles: Arc<RoleRepository>,
	pub widgets: Arc<WidgetRepository>,
	pub fixtures: Fixtures,
	_temp_dir: Option<TempDir>,
}

impl TestApp {
	/// In-memory database.
	pub async fn new() -> Self {
		let pool = create_test_pool().await.unwrap();
		Self::build(pool, None).await
	}

	/// File database in WAL mode with a multi-connection pool, for tests that
	/// need real concurrency.
	pub async fn with_file_db() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", temp_dir.path().join("widgets.db").display());
		let pool = create_pool(&url, 4).await.unwrap();
		ensure_schema(&pool).await.unwrap();
		Self::build(pool, Some(temp_dir)).await
	}

	async fn build(pool: sqlx::SqlitePool, temp_dir: Option<TempDir>) -> Self {
		let catalog = Arc::new(PermissionCatalog::builtin());
		let roles = Arc::new(RoleRepository::new(pool.clone()));
		let widgets = Arc::new(WidgetRepository::new(pool));
		roles.ensure_permissions(catalog.permissions()).await.unwrap();

		let service = WidgetService::new(
			roles.clone(),
			widgets.clone(),
			catalog,
			WidgetRules::default(),
		);

		let org_a = create_org_fixture(&roles, "org-a").await;
		let org_b = create_org_fixture(&roles, "org-b").await;

		let shared_widget = create_widget_as(&service, &org_a.owner, "Shared Widget", true).await;
		let private_widget = create_widget_as(&service, &org_a.owner, "Private Widget", false).await;
		let foreign_widget = create_widget_as(&service, &org_b.owner, "Org B Widget", true).await;

		Self {
			service,
			roles,
			widgets,
			fixtures: Fixtures {
				org_a,
				org_b,
				shared_widget,
				private_widget,
				foreign_widget,
			},
			_temp_dir: temp_dir,
		}
	}

	/// A new organization with the standard members and no widgets.
	pub async fn add_org(&self, slug: &str) -> OrgFixture {
		create_org_fixture(&self.roles, slug).await
	}

	pub async fn create_widget(&self, user: &TestUser, name: &str, is_shared: bool) -> WidgetResponse {
		create_widget_as(&self.service, user, name, is_shared).await
	}

	/// Inserts a system widget with no owner, bypassing the service.
	pub async fn create_ownerless_widget(&self, org_id: OrgId, name: &str) -> WidgetRecord {
		self
			.widgets
			.create_widget(&NewWidgetRecord {
				id: WidgetId::generate(),
				org_id,
				user_id: None,
				name: name.to_string(),
				description: String::new(),
				data_source: "messages".to_string(),
				metric: "count".to_string(),
				display_type: "number".to_string(),
				show_change: true,
				color: "blue".to_string(),
				size: "small".to_string(),
				filters: Vec::new(),
				is_shared: true,
				is_default: true,
			})
			.await
			.unwrap()
	}

	/// Widget ids of `org_id`, front to back.
	pub async fn ordered_ids(&self, org_id: OrgId) -> Vec<WidgetId> {
		self
			.display_orders(org_id)
			.await
			.into_iter()
			.map(|(id, _)| id)
			.collect()
	}

	pub async fn display_orders(&self, org_id: OrgId) -> Vec<(WidgetId, i64)> {
		self
			.widgets
			.list_widgets_for_org(&org_id)
			.await
			.unwrap()
			.into_iter()
			.map(|w| (w.id, w.display_order))
			.collect()
	}

	pub async fn row_count(&self, id: WidgetId) -> i64 {
		self.widgets.count_widgets_by_id(&id).await.unwrap()
	}

	/// Runs `op` as `user` (anonymous when `None`) and reduces the outcome to
	/// its error kind.
	pub async fn run(&self, op: &Op, user: Option<&TestUser>) -> Result<(), ErrorKind> {
		let ctx = user.map(TestUser::ctx).unwrap_or_else(AuthContext::anonymous);
		let outcome = match op {
			Op::List => self.service.list(&ctx).await.map(|_| ()),
			Op::Get(id) => self.service.get(&ctx, id).await.map(|_| ()),
			Op::Create(body) => {
				let req: CreateWidgetRequest = serde_json::from_value(body.clone()).unwrap();
				self.service.create(&ctx, req).await.map(|_| ())
			}
			Op::Update(id, body) => {
				let req: UpdateWidgetRequest = serde_json::from_value(body.clone()).unwrap();
				self.service.update(&ctx, id, req).await.map(|_| ())
			}
			Op::Delete(id) => self.service.delete(&ctx, id).await,
			Op::Reorder(ids) => {
				let req = ReorderWidgetsRequest {
					widget_ids: ids.clone(),
				};
				self.service.reorder(&ctx, req).await
			}
		};
		outcome.map_err(|e| e.kind())
	}
}

#[derive(Debug, Clone)]
pub enum Op {
	List,
	Get(String),
	Create(serde_json::Value),
	Update(String, serde_json::Value),
	Delete(String),
	Reorder(Vec<String>),
}

pub struct AccessCase {
	pub name: &'static str,
	pub op: Op,
	pub user: Option<TestUser>,
	pub expected: Result<(), ErrorKind>,
}

pub async fn run_access_cases(app: &TestApp, cases: &[AccessCase]) {
	for case in cases {
		let outcome = app.run(&case.op, case.user.as_ref()).await;
		if outcome != case.expected {
			panic!(
				"Case '{}': {:?} - expected {:?}, got {:?}",
				case.name, case.op, case.expected, outcome
			);
		}
	}
}

async fn create_widget_as(
	service: &WidgetService,
	user: &TestUser,
	name: &str,
	is_shared: bool,
) -> WidgetResponse {
	let req = CreateWidgetRequest {
		name: name.to_string(),
		data_source: "messages".to_string(),
		is_shared,
		..Default::default()
	};
	service.create(&user.ctx(), req).await.unwrap()
}

async fn create_org_fixture(roles: &RoleRepository, slug: &str) -> OrgFixture {
	let org_id = OrgId::generate();
	let everything = PermissionCatalog::builtin().permissions().to_vec();
	let analytics_user = analytics(&[
		PermissionAction::Read,
		PermissionAction::Write,
		PermissionAction::Delete,
	]);
	let editor = analytics(&[PermissionAction::Read, PermissionAction::Write]);
	let read_only = analytics(&[PermissionAction::Read]);

	let admin_role = roles
		.create_role(&org_id, "Admin", Some("Full access"), &everything)
		.await
		.unwrap();
	let analytics_role = roles
		.create_role(&org_id, "Analytics User", None, &analytics_user)
		.await
		.unwrap();
	let editor_role = roles
		.create_role(&org_id, "Editor", None, &editor)
		.await
		.unwrap();
	let read_only_role = roles
		.create_role(&org_id, "Read Only", None, &read_only)
		.await
		.unwrap();

	OrgFixture {
		org_id,
		admin: create_user(roles, org_id, &format!("admin@{slug}.test"), Some(admin_role.id)).await,
		owner: create_user(roles, org_id, &format!("owner@{slug}.test"), Some(analytics_role.id)).await,
		member: create_user(roles, org_id, &format!("member@{slug}.test"), Some(analytics_role.id)).await,
		editor: create_user(roles, org_id, &format!("editor@{slug}.test"), Some(editor_role.id)).await,
		viewer: create_user(roles, org_id, &format!("viewer@{slug}.test"), Some(read_only_role.id)).await,
		outsider: create_user(roles, org_id, &format!("outsider@{slug}.test"), None).await,
	}
}

async fn create_user(
	roles: &RoleRepository,
	org_id: OrgId,
	email: &str,
	role_id: Option<RoleId>,
) -> TestUser {
	let record = roles
		.create_user(&org_id, email, role_id.as_ref())
		.await
		.unwrap();
	TestUser {
		org_id,
		user_id: record.id,
	}
}
