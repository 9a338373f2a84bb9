// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hashing, verification and redaction of individual secret fields.
//!
//! Passwords and access keys are stored as Argon2id PHC strings, never in
//! plaintext. Every document that leaves the service goes through
//! [`Redact`] first; the internal fetch used by the credential merge does
//! not, because the merge needs the real digest.

use argon2::password_hash::{
	rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use prov_common_secret::{redact_in_place, SecretString};
use tracing::warn;

use crate::argon2_config::HashingConfig;
use crate::error::AuthError;
use crate::types::{AccessKey, Account, User};

/// Minimum plaintext length, in characters, for passwords and access keys.
pub const MIN_SECRET_LEN: usize = 10;

/// Hashes and verifies secret values with a fixed Argon2id configuration.
#[derive(Debug, Clone)]
pub struct SecretCodec {
	argon2: Argon2<'static>,
}

impl SecretCodec {
	pub fn new(config: &HashingConfig) -> Result<Self, AuthError> {
		Ok(Self {
			argon2: config.argon2_instance()?,
		})
	}

	/// Hashes a plaintext secret with a fresh random salt.
	///
	/// Fails with [`AuthError::WeakSecret`] when the plaintext is shorter
	/// than [`MIN_SECRET_LEN`] characters.
	pub fn hash(&self, plaintext: &SecretString) -> Result<String, AuthError> {
		if plaintext.char_len() < MIN_SECRET_LEN {
			return Err(AuthError::WeakSecret {
				min_len: MIN_SECRET_LEN,
			});
		}

		let salt = SaltString::generate(&mut OsRng);
		self
			.argon2
			.hash_password(plaintext.expose().as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hashing(e.to_string()))
	}

	/// Verifies a candidate against a stored digest.
	///
	/// A wrong candidate and an unparseable digest both yield `false`.
	/// Cost parameters are read from the digest, so digests produced under
	/// an older configuration still verify.
	pub fn verify(&self, digest: &str, candidate: &str) -> bool {
		let parsed = match PasswordHash::new(digest) {
			Ok(h) => h,
			Err(e) => {
				warn!(error = %e, "stored digest is not a valid PHC string");
				return false;
			}
		};
		self
			.argon2
			.verify_password(candidate.as_bytes(), &parsed)
			.is_ok()
	}
}

/// Replaces every secret field with the redaction sentinel.
pub trait Redact {
	fn redact(&mut self);

	fn redacted(mut self) -> Self
	where
		Self: Sized,
	{
		self.redact();
		self
	}
}

impl Redact for User {
	fn redact(&mut self) {
		redact_in_place(&mut self.password);
	}
}

impl Redact for AccessKey {
	fn redact(&mut self) {
		redact_in_place(&mut self.key);
	}
}

impl Redact for Account {
	fn redact(&mut self) {
		for key in &mut self.access_keys {
			key.redact();
		}
	}
}

impl<T: Redact> Redact for Vec<T> {
	fn redact(&mut self) {
		for item in self.iter_mut() {
			item.redact();
		}
	}
}
