// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Dashboard widget operations for Vantage.
//!
//! [`WidgetService`] is what a transport calls. It takes the raw identity as
//! an [`AuthContext`](vantage_server_auth::AuthContext), resolves it into a
//! principal, runs the authorization engine and only then touches the store.
//! Failures carry an [`ErrorKind`] for the transport to encode; this crate
//! knows nothing about HTTP.
//!
//! ```ignore
//! let service = WidgetService::new(roles, widgets, catalog, WidgetRules::from(&config.widgets));
//! let ctx = AuthContext::authenticated(org_id, user_id);
//! let dashboard = service.list(&ctx).await?;
//! ```

pub mod defaults;
pub mod error;
pub mod principal;
pub mod resolver;
pub mod service;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, Result, WidgetError};
pub use principal::PrincipalResolver;
pub use resolver::OwnershipResolver;
pub use service::WidgetService;
pub use types::{
	CreateWidgetRequest, DisplayType, FilterOperator, ReorderWidgetsRequest, UpdateWidgetRequest,
	WidgetFilter, WidgetResponse, WidgetSize,
};
pub use validation::WidgetRules;
