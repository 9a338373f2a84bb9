// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as read from a single source.

use serde::{Deserialize, Serialize};

use crate::sections::{HashingConfigLayer, LoggingConfigLayer, StoreConfigLayer};

/// One source's view of the configuration. Unset fields are `None` and
/// leave lower-precedence values in place when merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub store: Option<StoreConfigLayer>,
	#[serde(default)]
	pub hashing: Option<HashingConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl ServerConfigLayer {
	/// Overlays `other` on top of `self`.
	pub fn merge(&mut self, other: Self) {
		if let Some(other_store) = other.store {
			self.store
				.get_or_insert_with(Default::default)
				.merge(other_store);
		}
		if let Some(other_hashing) = other.hashing {
			self.hashing
				.get_or_insert_with(Default::default)
				.merge(other_hashing);
		}
		if let Some(other_logging) = other.logging {
			self.logging
				.get_or_insert_with(Default::default)
				.merge(other_logging);
		}
	}
}
