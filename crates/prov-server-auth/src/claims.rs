// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reconstruction of the acting user from an already-verified claim set.
//!
//! Token decoding and signature checks happen upstream. What arrives here
//! is the decoded payload: a user snapshot, a validity flag and an expiry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::access::has_basic_access;
use crate::error::AuthError;
use crate::types::User;

/// A decoded, signature-checked claim set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Serialized user snapshot.
	pub data: Option<serde_json::Value>,
	/// Set by the token verifier.
	pub valid: bool,
	/// Expiry as unix seconds.
	pub exp: i64,
}

/// The user snapshot as it appears in a claim set.
///
/// `id` and `active` are required. Anything not in [`User`] is rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClaimedUser {
	id: String,
	active: bool,
	#[serde(default)]
	description: String,
	#[serde(default)]
	display_name: String,
	#[serde(default)]
	sysop: bool,
	/// Tolerated for older tokens, never carried into the acting user.
	#[serde(default)]
	#[allow(dead_code)]
	password: Option<String>,
	#[serde(default)]
	sections: Vec<String>,
	#[serde(default)]
	sections_all: bool,
	#[serde(default)]
	accounts: Vec<String>,
	#[serde(default)]
	admin_accounts: Vec<String>,
}

impl From<ClaimedUser> for User {
	fn from(c: ClaimedUser) -> Self {
		User {
			id: c.id,
			description: c.description,
			display_name: c.display_name,
			active: c.active,
			sysop: c.sysop,
			password: String::new(),
			sections: c.sections,
			sections_all: c.sections_all,
			accounts: c.accounts,
			admin_accounts: c.admin_accounts,
		}
	}
}

impl TokenClaims {
	pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
		self.exp <= now.timestamp()
	}

	/// Returns the acting user, or why the claims cannot be trusted.
	///
	/// The returned user always has basic access.
	#[instrument(level = "debug", skip(self), fields(exp = self.exp, valid = self.valid))]
	pub fn acting_user(&self, now: DateTime<Utc>) -> Result<User, AuthError> {
		if !self.valid {
			return Err(AuthError::InvalidClaims("token not valid".to_string()));
		}
		if self.is_expired(now) {
			return Err(AuthError::ClaimsExpired);
		}
		let data = self.data.clone().ok_or(AuthError::MissingClaims)?;

		let claimed: ClaimedUser =
			serde_json::from_value(data).map_err(|e| AuthError::InvalidClaims(e.to_string()))?;
		let user = User::from(claimed);

		if !has_basic_access(&user) {
			return Err(AuthError::InactiveUser);
		}

		debug!(user_id = %user.id, "acting user reconstructed");
		Ok(user)
	}
}

/// Reconstructs the acting user from optional claims.
pub fn acting_user(claims: Option<&TokenClaims>, now: DateTime<Utc>) -> Result<User, AuthError> {
	claims.ok_or(AuthError::MissingClaims)?.acting_user(now)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Duration;
	use serde_json::json;

	fn claims(data: serde_json::Value) -> TokenClaims {
		TokenClaims {
			data: Some(data),
			valid: true,
			exp: (Utc::now() + Duration::hours(1)).timestamp(),
		}
	}

	#[test]
	fn reconstructs_active_user() {
		let claims = claims(json!({
			"id": "u1",
			"active": true,
			"accounts": ["acct1"],
			"sections_all": true
		}));
		let user = claims.acting_user(Utc::now()).unwrap();

		assert_eq!(user.id, "u1");
		assert!(user.is_member_of("acct1"));
		assert!(user.sections_all);
	}

	#[test]
	fn password_in_snapshot_is_dropped() {
		let claims = claims(json!({"id": "u1", "active": true, "password": "REDACTED"}));
		assert!(claims.acting_user(Utc::now()).unwrap().password.is_empty());
	}

	#[test]
	fn missing_claims_are_rejected() {
		assert!(matches!(acting_user(None, Utc::now()), Err(AuthError::MissingClaims)));

		let mut claims = claims(json!({}));
		claims.data = None;
		assert!(matches!(claims.acting_user(Utc::now()), Err(AuthError::MissingClaims)));
	}

	#[test]
	fn invalid_flag_is_rejected() {
		let mut claims = claims(json!({"id": "u1", "active": true}));
		claims.valid = false;
		assert!(matches!(claims.acting_user(Utc::now()), Err(AuthError::InvalidClaims(_))));
	}

	#[test]
	fn expired_claims_are_rejected() {
		let mut claims = claims(json!({"id": "u1", "active": true}));
		claims.exp = (Utc::now() - Duration::seconds(1)).timestamp();
		assert!(matches!(claims.acting_user(Utc::now()), Err(AuthError::ClaimsExpired)));
	}

	#[test]
	fn missing_required_field_is_invalid() {
		let claims = claims(json!({"id": "u1"}));
		assert!(matches!(claims.acting_user(Utc::now()), Err(AuthError::InvalidClaims(_))));
	}

	#[test]
	fn unknown_field_is_invalid() {
		let claims = claims(json!({"id": "u1", "active": true, "role": "root"}));
		assert!(matches!(claims.acting_user(Utc::now()), Err(AuthError::InvalidClaims(_))));
	}

	#[test]
	fn inactive_user_is_rejected() {
		let claims = claims(json!({"id": "u1", "active": false, "sysop": true}));
		assert!(matches!(claims.acting_user(Utc::now()), Err(AuthError::InactiveUser)));
	}
}
