// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Argon2 cost parameters for password and access-key hashing.
//!
//! The parameters travel as an explicit [`HashingConfig`] value into
//! [`SecretCodec::new`](crate::SecretCodec::new); nothing here is global.
//!
//! # Security Note
//!
//! [`HashingConfig::default`] matches the argon2 crate defaults for Argon2id:
//! - Memory: 19456 KiB (~19 MiB)
//! - Iterations: 2
//! - Parallelism: 1
//!
//! [`HashingConfig::for_tests`] is intentionally weak and MUST NOT be used
//! in production.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashingConfig {
	pub memory_kib: u32,
	pub iterations: u32,
	pub parallelism: u32,
}

impl Default for HashingConfig {
	fn default() -> Self {
		Self {
			memory_kib: Params::DEFAULT_M_COST,
			iterations: Params::DEFAULT_T_COST,
			parallelism: Params::DEFAULT_P_COST,
		}
	}
}

impl HashingConfig {
	/// Fast, insecure parameters for tests ONLY.
	pub fn for_tests() -> Self {
		Self {
			memory_kib: 1024,
			iterations: 1,
			parallelism: 1,
		}
	}

	/// Builds the Argon2id hasher, rejecting parameters argon2 refuses.
	pub(crate) fn argon2_instance(&self) -> Result<Argon2<'static>, AuthError> {
		let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
			.map_err(|e| AuthError::Hashing(format!("invalid argon2 parameters: {e}")))?;
		Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
	}
}
