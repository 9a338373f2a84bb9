// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the provisioning server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`PROV_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use prov_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Store at {} with prefix {}", config.store.url, config.store.index_prefix);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub store: StoreConfig,
	pub hashing: HashingConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`PROV_SERVER_*`, plus `ELASTIC_SERVER` and `SYSTEM_PREFIX`)
/// 2. Config file (`/etc/prov/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and finalize.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let store = layer.store.unwrap_or_default().finalize();
	let hashing = layer.hashing.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&store, &hashing)?;

	info!(
		store_url = %store.url,
		index_prefix = %store.index_prefix,
		hashing_memory_kib = hashing.memory_kib,
		hashing_iterations = hashing.iterations,
		log_format = %logging.format,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		store,
		hashing,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(store: &StoreConfig, hashing: &HashingConfig) -> Result<(), ConfigError> {
	if !(store.url.starts_with("http://") || store.url.starts_with("https://")) {
		return Err(ConfigError::Validation(format!(
			"store url '{}' must start with http:// or https://",
			store.url
		)));
	}

	if store.index_prefix.is_empty() {
		return Err(ConfigError::Validation(
			"store index prefix must not be empty".to_string(),
		));
	}

	if hashing.memory_kib == 0 || hashing.iterations == 0 || hashing.parallelism == 0 {
		return Err(ConfigError::Validation(
			"hashing memory, iterations and parallelism must all be non-zero".to_string(),
		));
	}

	Ok(())
}
