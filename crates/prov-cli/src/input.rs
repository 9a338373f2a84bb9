// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading JSON documents from files or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Reads and parses a JSON document. A path of `-` reads stdin.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let content = if path == Path::new("-") {
		let mut buf = String::new();
		std::io::stdin()
			.read_to_string(&mut buf)
			.context("failed to read stdin")?;
		buf
	} else {
		std::fs::read_to_string(path)
			.with_context(|| format!("failed to read {}", path.display()))?
	};

	serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Parses an inline JSON argument.
pub fn parse_json<T: DeserializeOwned>(arg: &str) -> Result<T> {
	serde_json::from_str(arg).with_context(|| format!("invalid JSON argument: {arg}"))
}

/// Pretty-prints a value to stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}
