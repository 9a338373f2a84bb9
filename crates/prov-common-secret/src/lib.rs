// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper and redaction sentinel for provisioning credentials.
//!
//! Two things live here because every other provisioning crate needs both:
//!
//! - [`REDACTED`], the fixed placeholder that replaces passwords and access
//!   keys on every outward read. The same string is accepted on the write
//!   path as "keep whatever is stored".
//! - [`Secret<T>`], a wrapper for plaintext credentials while they are in
//!   flight (request bodies, CLI arguments) so they never reach a log line.
//!
//! # Example
//!
//! ```
//! use prov_common_secret::{Secret, REDACTED};
//!
//! let password = Secret::new("correct-horse-battery".to_string());
//!
//! assert_eq!(format!("{:?}", password), "Secret(\"REDACTED\")");
//! assert_eq!(format!("{}", password), REDACTED);
//! assert_eq!(password.expose(), "correct-horse-battery");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// Placeholder substituted for every secret field on read.
///
/// Stored documents written by earlier deployments use exactly this string,
/// so it must not change.
pub const REDACTED: &str = "REDACTED";

/// Returns true if `value` is the redaction sentinel.
pub fn is_redacted(value: &str) -> bool {
	value == REDACTED
}

/// Returns true if `value` carries no new secret: either empty or the
/// redaction sentinel echoed back from an earlier read.
pub fn is_unchanged_marker(value: &str) -> bool {
	value.is_empty() || is_redacted(value)
}

/// Overwrites a secret field in place with [`REDACTED`].
///
/// The previous contents are zeroized before being replaced.
pub fn redact_in_place(value: &mut String) {
	value.zeroize();
	value.push_str(REDACTED);
}

/// A wrapper for sensitive values that prevents accidental exposure.
///
/// - Debug, Display and Serialize always produce [`REDACTED`]
/// - The inner value is zeroized on drop
/// - There is no `Deref`; call [`Secret::expose`] to read the value
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Convenience alias for the common case of secret strings.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	/// Create a new secret wrapper around the given value.
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Explicitly access the inner value.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Consume the wrapper and return a copy of the inner value.
	///
	/// The wrapper's own memory is still zeroized when it drops.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl SecretString {
	/// Length of the secret in characters, not bytes.
	pub fn char_len(&self) -> usize {
		self.inner.chars().count()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Secret::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Secret::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			let inner = T::deserialize(deserializer)?;
			Ok(Secret::new(inner))
		}
	}
}
