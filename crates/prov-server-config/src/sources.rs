// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{HashingConfigLayer, LogFormat, LoggingConfigLayer, StoreConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/prov/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: PROV_SERVER_<SECTION>_<FIELD>. The store URL and index
/// prefix also accept the legacy `ELASTIC_SERVER` and `SYSTEM_PREFIX`
/// names; the `PROV_SERVER_*` name wins when both are set.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from(&|name| std::env::var(name).ok())
	}
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn load_from(lookup: Lookup<'_>) -> Result<ServerConfigLayer, ConfigError> {
	Ok(ServerConfigLayer {
		store: Some(load_store(lookup)?),
		hashing: Some(load_hashing(lookup)?),
		logging: Some(load_logging(lookup)?),
	})
}

fn env_var(lookup: Lookup<'_>, name: &str) -> Option<String> {
	lookup(name).filter(|s| !s.is_empty())
}

fn env_u32(lookup: Lookup<'_>, name: &str) -> Result<Option<u32>, ConfigError> {
	match env_var(lookup, name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u32 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(lookup: Lookup<'_>, name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(lookup, name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_store(lookup: Lookup<'_>) -> Result<StoreConfigLayer, ConfigError> {
	Ok(StoreConfigLayer {
		url: env_var(lookup, "PROV_SERVER_STORE_URL").or_else(|| env_var(lookup, "ELASTIC_SERVER")),
		index_prefix: env_var(lookup, "PROV_SERVER_STORE_INDEX_PREFIX")
			.or_else(|| env_var(lookup, "SYSTEM_PREFIX")),
		timeout_secs: env_u64(lookup, "PROV_SERVER_STORE_TIMEOUT_SECS")?,
	})
}

fn load_hashing(lookup: Lookup<'_>) -> Result<HashingConfigLayer, ConfigError> {
	Ok(HashingConfigLayer {
		memory_kib: env_u32(lookup, "PROV_SERVER_HASHING_MEMORY_KIB")?,
		iterations: env_u32(lookup, "PROV_SERVER_HASHING_ITERATIONS")?,
		parallelism: env_u32(lookup, "PROV_SERVER_HASHING_PARALLELISM")?,
	})
}

fn load_logging(lookup: Lookup<'_>) -> Result<LoggingConfigLayer, ConfigError> {
	let format = match env_var(lookup, "PROV_SERVER_LOG_FORMAT") {
		Some(v) => Some(v.parse::<LogFormat>().map_err(|message| ConfigError::InvalidValue {
			key: "PROV_SERVER_LOG_FORMAT".to_string(),
			message,
		})?),
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: env_var(lookup, "PROV_SERVER_LOG_LEVEL"),
		format,
	})
}
