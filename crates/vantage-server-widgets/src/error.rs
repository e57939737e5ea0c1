// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for widget operations.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use vantage_server_auth::DenyReason;
use vantage_server_db::DbError;

/// Result type for widget operations.
pub type Result<T> = std::result::Result<T, WidgetError>;

/// Errors returned by [`WidgetService`](crate::WidgetService).
///
/// A failed call reports exactly one error: the first check that failed, in
/// the order authentication, coarse grant, input shape, existence,
/// ownership, domain validation.
#[derive(Debug, Error)]
pub enum WidgetError {
	#[error("authentication required")]
	Unauthenticated,

	#[error("access denied: {0}")]
	Forbidden(DenyReason),

	/// Absent, or owned by another organization. The two are not told apart.
	#[error("widget not found")]
	NotFound,

	#[error("invalid widget id: {0}")]
	InvalidId(String),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("database error: {0}")]
	Database(DbError),

	#[error("internal error: {0}")]
	Internal(String),
}

impl From<DbError> for WidgetError {
	fn from(err: DbError) -> Self {
		match err {
			DbError::NotFound(_) => WidgetError::NotFound,
			other => WidgetError::Database(other),
		}
	}
}

/// Transport-neutral outcome category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	Unauthenticated,
	Forbidden,
	NotFound,
	InvalidInput,
	/// Store or configuration failure; not caused by the caller.
	Internal,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::Unauthenticated => "unauthenticated",
			ErrorKind::Forbidden => "forbidden",
			ErrorKind::NotFound => "not_found",
			ErrorKind::InvalidInput => "invalid_input",
			ErrorKind::Internal => "internal",
		}
	}
}

impl fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl WidgetError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			WidgetError::Unauthenticated => ErrorKind::Unauthenticated,
			WidgetError::Forbidden(_) => ErrorKind::Forbidden,
			WidgetError::NotFound => ErrorKind::NotFound,
			WidgetError::InvalidId(_) | WidgetError::InvalidInput(_) => ErrorKind::InvalidInput,
			WidgetError::Database(_) | WidgetError::Internal(_) => ErrorKind::Internal,
		}
	}

	/// True for failures the caller did not cause. These are logged at
	/// `error`; everything else is a terminal, non-retryable outcome.
	pub fn is_internal(&self) -> bool {
		self.kind() == ErrorKind::Internal
	}
}
