// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential merge policy for full-replace upserts.
//!
//! The store replaces whole documents on every write, so a client that
//! omits a secret (or echoes back the redaction sentinel it was given) must
//! not wipe the stored digest. Each secret field resolves to one of:
//!
//! - a new plaintext, which is length-checked and hashed
//! - an empty or redacted value, which keeps the stored digest
//! - an empty or redacted value with nothing stored, which is rejected
//!
//! Access keys are matched against the stored document by `name`.

use prov_common_secret::{is_unchanged_marker, SecretString};
use std::fmt::Display;
use tracing::{debug, instrument};

use crate::codec::SecretCodec;
use crate::error::AuthError;
use crate::types::{Account, User};

/// Outcome of the internal, un-redacted fetch that precedes a guarded write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
	Found(T),
	NotFound,
	/// The store failed for a reason other than "not found".
	Failed(String),
}

impl<T> Lookup<T> {
	/// Converts a store result where `Ok(None)` means "not found".
	pub fn from_result<E: Display>(result: Result<Option<T>, E>) -> Self {
		match result {
			Ok(Some(doc)) => Lookup::Found(doc),
			Ok(None) => Lookup::NotFound,
			Err(e) => Lookup::Failed(e.to_string()),
		}
	}

	pub fn as_ref(&self) -> Lookup<&T> {
		match self {
			Lookup::Found(doc) => Lookup::Found(doc),
			Lookup::NotFound => Lookup::NotFound,
			Lookup::Failed(e) => Lookup::Failed(e.clone()),
		}
	}

	/// Returns the stored document, if any, failing closed on a store error.
	pub fn into_existing(self) -> Result<Option<T>, AuthError> {
		match self {
			Lookup::Found(doc) => Ok(Some(doc)),
			Lookup::NotFound => Ok(None),
			Lookup::Failed(e) => Err(AuthError::BackingStore(e)),
		}
	}
}

/// Resolves secret fields on incoming documents against stored ones.
#[derive(Debug, Clone)]
pub struct CredentialPolicy {
	codec: SecretCodec,
}

impl CredentialPolicy {
	pub fn new(codec: SecretCodec) -> Self {
		Self { codec }
	}

	pub fn codec(&self) -> &SecretCodec {
		&self.codec
	}

	/// Resolves a single secret field to the digest that should be persisted.
	pub fn resolve_secret(
		&self,
		field: &str,
		incoming: &str,
		stored: Option<&str>,
	) -> Result<String, AuthError> {
		if is_unchanged_marker(incoming) {
			return match stored {
				Some(digest) => Ok(digest.to_string()),
				None => Err(AuthError::MissingSecret {
					field: field.to_string(),
				}),
			};
		}

		self.codec.hash(&SecretString::from(incoming))
	}

	/// Resolves `user.password` in place.
	#[instrument(skip(self, user, existing), fields(user_id = %user.id))]
	pub fn merge_user(&self, user: &mut User, existing: Lookup<&User>) -> Result<(), AuthError> {
		let existing = existing.into_existing()?;
		let stored = existing.map(|u| u.password.as_str());

		let digest = self.resolve_secret("password", &user.password, stored)?;
		user.password = digest;
		debug!(existing = stored.is_some(), "resolved user password");
		Ok(())
	}

	/// Resolves every access key on `account` in place.
	///
	/// Keys are processed in incoming order and the account is only modified
	/// once every key has resolved.
	#[instrument(
		skip(self, account, existing),
		fields(account_id = %account.id, keys = account.access_keys.len())
	)]
	pub fn merge_account_keys(
		&self,
		account: &mut Account,
		existing: Lookup<&Account>,
	) -> Result<(), AuthError> {
		let existing = existing.into_existing()?;

		let mut resolved = Vec::with_capacity(account.access_keys.len());
		for key in &account.access_keys {
			let stored = existing
				.and_then(|a| a.access_key(&key.name))
				.map(|k| k.key.as_str());
			let field = format!("access key {:?}", key.name);
			resolved.push(self.resolve_secret(&field, &key.key, stored)?);
		}

		for (key, digest) in account.access_keys.iter_mut().zip(resolved) {
			key.key = digest;
		}
		Ok(())
	}
}
