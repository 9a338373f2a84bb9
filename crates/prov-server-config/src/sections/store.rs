// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Document store connection section.

use std::time::Duration;

use prov_server_store::elastic::{DEFAULT_TIMEOUT, DEFAULT_URL};
use prov_server_store::{ElasticConfig, DEFAULT_INDEX_PREFIX};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfigLayer {
	pub url: Option<String>,
	pub index_prefix: Option<String>,
	pub timeout_secs: Option<u64>,
}

impl StoreConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.index_prefix.is_some() {
			self.index_prefix = other.index_prefix;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	pub fn finalize(self) -> StoreConfig {
		StoreConfig {
			url: self.url.unwrap_or_else(|| DEFAULT_URL.to_string()),
			index_prefix: self
				.index_prefix
				.unwrap_or_else(|| DEFAULT_INDEX_PREFIX.to_string()),
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT.as_secs()),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
	pub url: String,
	/// Prepended to `user`, `account` and `asset` to name each index.
	pub index_prefix: String,
	pub timeout_secs: u64,
}

impl Default for StoreConfig {
	fn default() -> Self {
		StoreConfigLayer::default().finalize()
	}
}

impl StoreConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

impl From<&StoreConfig> for ElasticConfig {
	fn from(config: &StoreConfig) -> Self {
		ElasticConfig {
			url: config.url.clone(),
			index_prefix: config.index_prefix.clone(),
			timeout: config.timeout(),
		}
	}
}
