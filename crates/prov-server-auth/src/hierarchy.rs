// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Parent/child account ownership rules.
//!
//! An account created under a parent stays with that parent: a
//! parent-scoped upsert can only rewrite accounts the caller already owns,
//! and the first write fixes `parent`. Reads and asset moves are limited to
//! the caller's own account and its direct children.

use tracing::{debug, instrument};

use crate::credentials::Lookup;
use crate::error::AuthError;
use crate::types::{Account, Asset, AssetAssociation};

/// How an account upsert was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertScope<'a> {
	/// `parent` is taken verbatim from the request.
	Unscoped,
	/// Issued by the given parent account on behalf of a child.
	Parent(&'a str),
}

/// Applies the ownership rules for an upsert to the incoming account.
///
/// For a parent-scoped upsert of a new account, `parent` is forced to the
/// caller. An existing account must already belong to the caller.
#[instrument(level = "debug", skip(account, existing), fields(account_id = %account.id))]
pub fn apply_scope(
	scope: UpsertScope<'_>,
	account: &mut Account,
	existing: Lookup<&Account>,
) -> Result<(), AuthError> {
	let parent_id = match scope {
		UpsertScope::Unscoped => return Ok(()),
		UpsertScope::Parent(parent_id) => parent_id,
	};
	require_parent(parent_id, &account.id)?;

	match existing.into_existing()? {
		Some(stored) if stored.parent != parent_id => Err(AuthError::HierarchyViolation {
			account_id: account.id.clone(),
			stored_parent: stored.parent.clone(),
			requested_parent: parent_id.to_string(),
		}),
		Some(_) => {
			account.parent = parent_id.to_string();
			Ok(())
		}
		None => {
			debug!(parent_id, "new child account");
			account.parent = parent_id.to_string();
			Ok(())
		}
	}
}

/// Parent-scoped operations need a non-blank parent id.
fn require_parent(parent_id: &str, account_id: &str) -> Result<(), AuthError> {
	if parent_id.trim().is_empty() {
		return Err(AuthError::AccountAccess {
			parent_id: parent_id.to_string(),
			account_id: account_id.to_string(),
		});
	}
	Ok(())
}

/// Returns true if `account_id` is `parent_id` itself or one of its children.
///
/// `stored` is the account document for `account_id`, if one exists. A
/// blank `parent_id` has no children and is nobody's self.
pub fn is_self_or_child(parent_id: &str, account_id: &str, stored: Option<&Account>) -> bool {
	if parent_id.trim().is_empty() {
		return false;
	}
	account_id == parent_id || stored.is_some_and(|a| a.parent == parent_id)
}

/// Fails with [`AuthError::AccountAccess`] unless [`is_self_or_child`] holds.
pub fn ensure_self_or_child(
	parent_id: &str,
	account_id: &str,
	stored: Option<&Account>,
) -> Result<(), AuthError> {
	if is_self_or_child(parent_id, account_id, stored) {
		Ok(())
	} else {
		Err(AuthError::AccountAccess {
			parent_id: parent_id.to_string(),
			account_id: account_id.to_string(),
		})
	}
}

/// Moves every route on `asset` from the source account to the destination.
///
/// Both accounts must be the requesting parent or one of its children.
/// Returns the number of rewritten routes, failing with
/// [`AuthError::NoAssociation`] if there were none.
#[instrument(
	level = "debug",
	skip(association, from, to, asset),
	fields(
		asset_id = %association.asset_id,
		from = %association.from_account_id,
		to = %association.to_account_id,
	)
)]
pub fn reassociate_asset(
	parent_id: &str,
	association: &AssetAssociation,
	from: Option<&Account>,
	to: Option<&Account>,
	asset: &mut Asset,
) -> Result<usize, AuthError> {
	ensure_self_or_child(parent_id, &association.from_account_id, from)?;
	ensure_self_or_child(parent_id, &association.to_account_id, to)?;

	let mut moved = 0;
	for route in asset
		.routes
		.iter_mut()
		.filter(|r| r.account_id == association.from_account_id)
	{
		route.account_id = association.to_account_id.clone();
		moved += 1;
	}

	if moved == 0 {
		return Err(AuthError::NoAssociation {
			asset_id: asset.id.clone(),
			account_id: association.from_account_id.clone(),
		});
	}

	debug!(moved, "routes reassociated");
	Ok(moved)
}
