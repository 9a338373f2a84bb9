// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

/// Default prefix for every provisioning index.
pub const DEFAULT_INDEX_PREFIX: &str = "system_";

/// The kinds of document kept by provisioning, one index each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
	User,
	Account,
	Asset,
}

impl DocumentKind {
	pub const ALL: [DocumentKind; 3] = [DocumentKind::User, DocumentKind::Account, DocumentKind::Asset];

	pub fn as_str(&self) -> &'static str {
		match self {
			DocumentKind::User => "user",
			DocumentKind::Account => "account",
			DocumentKind::Asset => "asset",
		}
	}

	/// Index name for this kind under `prefix`, e.g. `system_account`.
	pub fn index(&self, prefix: &str) -> String {
		format!("{prefix}{}", self.as_str())
	}
}

impl fmt::Display for DocumentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
