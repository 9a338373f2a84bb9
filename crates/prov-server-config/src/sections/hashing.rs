// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret hashing cost section.

use prov_server_auth::HashingConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashingConfigLayer {
	pub memory_kib: Option<u32>,
	pub iterations: Option<u32>,
	pub parallelism: Option<u32>,
}

impl HashingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.memory_kib.is_some() {
			self.memory_kib = other.memory_kib;
		}
		if other.iterations.is_some() {
			self.iterations = other.iterations;
		}
		if other.parallelism.is_some() {
			self.parallelism = other.parallelism;
		}
	}

	pub fn finalize(self) -> HashingConfig {
		let defaults = HashingConfig::default();
		HashingConfig {
			memory_kib: self.memory_kib.unwrap_or(defaults.memory_kib),
			iterations: self.iterations.unwrap_or(defaults.iterations),
			parallelism: self.parallelism.unwrap_or(defaults.parallelism),
		}
	}
}
