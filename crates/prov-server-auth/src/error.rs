// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization and credential error types.

use thiserror::Error;

/// Errors raised by the credential lifecycle, the hierarchy guard and
/// claim reconstruction.
///
/// A negative access decision is never one of these: `has_access` and
/// friends return `false` and the caller branches on it.
#[derive(Debug, Error)]
pub enum AuthError {
	// =========================================================================
	// Credential Errors
	// =========================================================================
	/// A plaintext secret was shorter than the minimum length.
	#[error("secret must be at least {min_len} characters")]
	WeakSecret { min_len: usize },

	/// A new resource was submitted with an empty or redacted secret and
	/// there is no stored digest to fall back on.
	#[error("no secret supplied for {field} and none is stored")]
	MissingSecret { field: String },

	/// The lookup that precedes a guarded write failed for a reason other
	/// than "not found".
	#[error("backing store lookup failed: {0}")]
	BackingStore(String),

	// =========================================================================
	// Hierarchy Errors
	// =========================================================================
	/// A parent-scoped upsert targeted an account owned by someone else.
	#[error(
		"account {account_id} belongs to parent {stored_parent:?}, not {requested_parent:?}"
	)]
	HierarchyViolation {
		account_id: String,
		stored_parent: String,
		requested_parent: String,
	},

	/// The account is neither the caller's own account nor a direct child.
	#[error("account {account_id} is not {parent_id} or one of its children")]
	AccountAccess {
		parent_id: String,
		account_id: String,
	},

	/// A re-association matched no route on the asset.
	#[error("asset {asset_id} has no route for account {account_id}")]
	NoAssociation {
		asset_id: String,
		account_id: String,
	},

	// =========================================================================
	// Claim Errors
	// =========================================================================
	/// No claim set accompanied the request.
	#[error("authentication required")]
	MissingClaims,

	/// The claim set was flagged invalid or its user snapshot did not parse.
	#[error("invalid claims: {0}")]
	InvalidClaims(String),

	/// The claim set is past its expiry.
	#[error("claims expired")]
	ClaimsExpired,

	/// The user in the claim set is not active.
	#[error("user is not active")]
	InactiveUser,

	// =========================================================================
	// Infrastructure Errors
	// =========================================================================
	/// Hashing failed or the hashing parameters were rejected.
	#[error("hashing error: {0}")]
	Hashing(String),
}

impl AuthError {
	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		matches!(self, AuthError::BackingStore(_) | AuthError::Hashing(_))
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			AuthError::WeakSecret { .. } | AuthError::MissingSecret { .. } => 400,

			AuthError::MissingClaims | AuthError::InvalidClaims(_) | AuthError::ClaimsExpired => 401,

			AuthError::HierarchyViolation { .. }
			| AuthError::AccountAccess { .. }
			| AuthError::InactiveUser => 403,

			AuthError::NoAssociation { .. } => 422,

			AuthError::BackingStore(_) | AuthError::Hashing(_) => 500,
		}
	}
}
