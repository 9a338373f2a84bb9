// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration section.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

impl FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"text" => Ok(LogFormat::Text),
			"json" => Ok(LogFormat::Json),
			other => Err(format!("unknown log format '{other}' (expected text or json)")),
		}
	}
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LogFormat::Text => f.write_str("text"),
			LogFormat::Json => f.write_str("json"),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| "info".to_string()),
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
	/// An `EnvFilter` directive, e.g. `info` or `prov_server_provisioning=debug`.
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		LoggingConfigLayer::default().finalize()
	}
}
