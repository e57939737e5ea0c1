// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Attribute-based access control for tenant-scoped resources.
//!
//! Decisions combine the principal's coarse role grants with per-instance
//! [`OwnershipFacts`]. The engine is pure; callers load facts and translate
//! denials into their own error vocabulary.

pub mod engine;
pub mod policies;
pub mod types;

pub use engine::*;
pub use types::*;
