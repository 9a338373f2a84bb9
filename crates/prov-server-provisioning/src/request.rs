// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use prov_common_secret::SecretString;
use prov_server_auth::User;
use serde::{Deserialize, Serialize};

/// A user id and candidate password.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
	pub id: String,
	pub password: SecretString,
}

impl Credentials {
	pub fn new(id: impl Into<String>, password: impl Into<SecretString>) -> Self {
		Self {
			id: id.into(),
			password: password.into(),
		}
	}
}

/// Outcome of authenticating a known user.
///
/// `user` is always redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authentication {
	pub user: User,
	pub authenticated: bool,
}

/// A request to check a plaintext access key against an account.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyCheck {
	pub account_id: String,
	pub key_name: String,
	pub key: SecretString,
}

impl KeyCheck {
	pub fn new(
		account_id: impl Into<String>,
		key_name: impl Into<String>,
		key: impl Into<SecretString>,
	) -> Self {
		Self {
			account_id: account_id.into(),
			key_name: key_name.into(),
			key: key.into(),
		}
	}
}
