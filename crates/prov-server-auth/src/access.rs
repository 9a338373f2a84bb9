// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access decision evaluation.
//!
//! Three pure functions over a [`User`] and an [`AccessCheck`]:
//!
//! 1. [`has_basic_access`]: the user is active
//! 2. [`has_admin_access`]: sysop, or administrator of the single asserted account
//! 3. [`has_access`]: sysop, admin, or member of every asserted account with
//!    every asserted section
//!
//! A denial is an ordinary `false`, not an error. Empty account and section
//! lists are satisfied trivially.

use tracing::instrument;

use crate::types::{AccessCheck, AccessCheckResult, User};

/// Returns true if the user may do anything at all.
pub fn has_basic_access(user: &User) -> bool {
	user.active
}

/// Evaluates whether the user administers the asserted account.
///
/// Asserting more than one account is always denied for non-sysops, even if
/// the user administers all of them.
#[instrument(
	level = "debug",
	skip(user, check),
	fields(user_id = %user.id, accounts = check.accounts.len())
)]
pub fn has_admin_access(user: &User, check: &AccessCheck) -> bool {
	if !has_basic_access(user) {
		return false;
	}

	if user.sysop {
		return true;
	}

	if check.accounts.len() > 1 {
		return false;
	}

	check.accounts.iter().all(|a| user.is_admin_of(a))
}

/// Evaluates whether the user may access the asserted accounts and sections.
#[instrument(
	level = "debug",
	skip(user, check),
	fields(
		user_id = %user.id,
		accounts = check.accounts.len(),
		sections = check.sections.len(),
	)
)]
pub fn has_access(user: &User, check: &AccessCheck) -> bool {
	if !has_basic_access(user) {
		return false;
	}

	if user.sysop {
		return true;
	}

	if has_admin_access(user, check) {
		return true;
	}

	if !check.accounts.iter().all(|a| user.is_member_of(a)) {
		return false;
	}

	user.sections_all || check.sections.iter().all(|s| user.has_section(s))
}

/// Runs [`has_access`] and packages the outcome for a response.
pub fn check_access(user: &User, check: AccessCheck) -> AccessCheckResult {
	let status = has_access(user, &check);
	result(user, check, status, "access")
}

/// Runs [`has_admin_access`] and packages the outcome for a response.
pub fn check_admin_access(user: &User, check: AccessCheck) -> AccessCheckResult {
	let status = has_admin_access(user, &check);
	result(user, check, status, "admin access")
}

fn result(user: &User, access_check: AccessCheck, status: bool, what: &str) -> AccessCheckResult {
	let message = if status {
		format!("user {} has {what}", user.id)
	} else {
		format!("user {} does not have {what}", user.id)
	};
	AccessCheckResult {
		access_check,
		status,
		message,
	}
}
