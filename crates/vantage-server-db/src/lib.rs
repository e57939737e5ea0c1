// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for Vantage server.
//!
//! SQLite persistence through `sqlx`. Each aggregate gets a `*Store` trait
//! (what the service layer depends on) and a `*Repository` implementing it
//! over a [`SqlitePool`](sqlx::SqlitePool):
//!
//! - [`RoleStore`]: permissions, tenant-scoped roles and user role assignment
//! - [`WidgetStore`]: dashboard widgets, including the atomic reorder
//!
//! IDs are stored as hyphenated UUID strings and timestamps as RFC 3339.

mod convert;
pub mod error;
pub mod pool;
pub mod role;
pub mod schema;
pub mod testing;
pub mod widget;

pub use error::{DbError, Result};
pub use pool::create_pool;
pub use role::{RoleRecord, RoleRepository, RoleStore, UserRecord};
pub use schema::ensure_schema;
pub use widget::{
	NewWidgetRecord, WidgetFilterRecord, WidgetRecord, WidgetRepository, WidgetStore,
};
