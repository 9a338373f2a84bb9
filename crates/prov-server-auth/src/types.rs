// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning documents and access-check value objects.
//!
//! Documents ([`User`], [`Account`], [`Asset`]) are stored whole: every
//! write replaces the previous version, so each struct is the complete
//! record. Field names on the wire are snake_case and missing fields take
//! their zero value, matching what earlier deployments wrote.
//!
//! Membership lists (`sections`, `accounts`, `admin_accounts`) are kept as
//! `Vec<String>` so documents round-trip verbatim, but they are only ever
//! queried as sets.

use serde::{Deserialize, Serialize};

/// A user document.
///
/// `password` holds an Argon2 PHC digest once persisted. On every read that
/// leaves the service it is replaced by the redaction sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
	pub id: String,
	pub description: String,
	pub display_name: String,
	pub active: bool,
	/// Super-admin: bypasses every account and section check.
	pub sysop: bool,
	pub password: String,
	pub sections: Vec<String>,
	pub sections_all: bool,
	/// Accounts the user is a member of.
	pub accounts: Vec<String>,
	/// Accounts the user administers.
	pub admin_accounts: Vec<String>,
}

impl User {
	pub fn is_member_of(&self, account_id: &str) -> bool {
		self.accounts.iter().any(|a| a == account_id)
	}

	pub fn is_admin_of(&self, account_id: &str) -> bool {
		self.admin_accounts.iter().any(|a| a == account_id)
	}

	pub fn has_section(&self, section: &str) -> bool {
		self.sections.iter().any(|s| s == section)
	}
}

/// A named access key belonging to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessKey {
	/// Identifies the key within its account. Lookups take the first match.
	pub name: String,
	pub description: String,
	/// Argon2 PHC digest once persisted.
	pub key: String,
	pub active: bool,
}

/// An account document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
	pub id: String,
	/// Owning parent account. Empty for a top-level account.
	pub parent: String,
	pub description: String,
	pub display_name: String,
	pub active: bool,
	pub modules: Vec<String>,
	pub org_id: i64,
	pub access_keys: Vec<AccessKey>,
}

impl Account {
	pub fn is_top_level(&self) -> bool {
		self.parent.is_empty()
	}

	/// Returns the first access key with the given name.
	pub fn access_key(&self, name: &str) -> Option<&AccessKey> {
		self.access_keys.iter().find(|k| k.name == name)
	}
}

/// Routes an asset's data to an account and model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
	pub account_id: String,
	pub model_id: String,
	#[serde(rename = "type")]
	pub route_type: String,
}

/// An asset document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Asset {
	pub id: String,
	pub description: String,
	pub display_name: String,
	pub asset_class: String,
	pub active: bool,
	pub routes: Vec<Route>,
}

impl Asset {
	pub fn is_routed_to(&self, account_id: &str) -> bool {
		self.routes.iter().any(|r| r.account_id == account_id)
	}
}

/// Request to move an asset's routes from one account to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetAssociation {
	pub asset_id: String,
	pub from_account_id: String,
	pub to_account_id: String,
}

/// The accounts and sections a caller asserts access to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessCheck {
	pub accounts: Vec<String>,
	pub sections: Vec<String>,
}

impl AccessCheck {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn account(mut self, account_id: impl Into<String>) -> Self {
		self.accounts.push(account_id.into());
		self
	}

	pub fn section(mut self, section: impl Into<String>) -> Self {
		self.sections.push(section.into());
		self
	}
}

/// Response artifact for an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCheckResult {
	pub access_check: AccessCheck,
	pub status: bool,
	pub message: String,
}
