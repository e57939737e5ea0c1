// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and authorization error types.

use thiserror::Error;

/// Errors that can occur while establishing a principal or evaluating access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
	// =========================================================================
	// Authentication Errors
	// =========================================================================
	/// No organization or user identity was supplied with the request.
	#[error("authentication required")]
	AuthenticationRequired,

	// =========================================================================
	// Authorization Errors
	// =========================================================================
	/// Access denied by policy.
	#[error("access denied")]
	AccessDenied,

	/// The resource was not found (or lives in another organization).
	#[error("resource not found")]
	ResourceNotFound,

	// =========================================================================
	// Permission Model Errors
	// =========================================================================
	/// A permission string did not have the `resource:action` shape.
	#[error("malformed permission: {0}")]
	MalformedPermission(String),

	/// The resource half of a permission string is not a known category.
	#[error("unknown permission resource: {0}")]
	UnknownResource(String),

	/// The action half of a permission string is not a known action.
	#[error("unknown permission action: {0}")]
	UnknownAction(String),

	/// The permission template produced an empty catalog.
	#[error("permission catalog is empty")]
	EmptyCatalog,
}

impl AuthError {
	/// Returns true for errors raised by a misconfigured permission model
	/// rather than by a caller.
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			AuthError::MalformedPermission(_)
				| AuthError::UnknownResource(_)
				| AuthError::UnknownAction(_)
				| AuthError::EmptyCatalog
		)
	}
}
