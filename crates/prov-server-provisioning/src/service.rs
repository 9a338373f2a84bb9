// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::{DateTime, Utc};
use prov_server_auth::hierarchy::{apply_scope, ensure_self_or_child, reassociate_asset, UpsertScope};
use prov_server_auth::{
	check_access, check_admin_access, AccessCheck, AccessCheckResult, Account, Asset,
	AssetAssociation, CredentialPolicy, Lookup, Redact, SecretCodec, TokenClaims, User,
};
use prov_server_store::query::keyword_term;
use prov_server_store::{fetch_doc, persist_doc, search_docs, DocumentKind, DocumentStore};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ProvisioningError;
use crate::request::{Authentication, Credentials, KeyCheck};

/// Result type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisioningError>;

/// Read-merge-write orchestration of the credential and hierarchy rules
/// over a [`DocumentStore`].
#[derive(Clone)]
pub struct ProvisioningService {
	store: Arc<dyn DocumentStore>,
	policy: CredentialPolicy,
}

impl ProvisioningService {
	/// Create a new provisioning service.
	pub fn new(store: Arc<dyn DocumentStore>, codec: SecretCodec) -> Self {
		Self {
			store,
			policy: CredentialPolicy::new(codec),
		}
	}

	/// The index prefix documents are stored under.
	pub fn index_prefix(&self) -> &str {
		self.store.index_prefix()
	}

	/// Internal, un-redacted fetch preceding a guarded operation.
	async fn lookup<T: DeserializeOwned>(&self, kind: DocumentKind, id: &str) -> Lookup<T> {
		let lookup = Lookup::from_result(fetch_doc(self.store.as_ref(), kind, id).await);
		if let Lookup::Failed(e) = &lookup {
			tracing::error!(kind = %kind, id, error = %e, "guard lookup failed");
		}
		lookup
	}

	async fn existing<T: DeserializeOwned>(&self, kind: DocumentKind, id: &str) -> Result<Option<T>> {
		Ok(self.lookup(kind, id).await.into_existing()?)
	}

	async fn get_redacted<T: DeserializeOwned + Redact>(&self, kind: DocumentKind, id: &str) -> Result<T> {
		fetch_doc::<T>(self.store.as_ref(), kind, id)
			.await?
			.map(Redact::redacted)
			.ok_or_else(|| ProvisioningError::not_found(kind, id))
	}

	fn require_id(kind: DocumentKind, id: &str) -> Result<()> {
		if id.trim().is_empty() {
			return Err(ProvisioningError::InvalidRequest(format!("{kind} id is required")));
		}
		Ok(())
	}

	// =========================================================================
	// Users
	// =========================================================================

	/// Create or replace a user, resolving the password against the stored one.
	///
	/// Returns the persisted user, redacted.
	#[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
	pub async fn upsert_user(&self, mut user: User) -> Result<User> {
		Self::require_id(DocumentKind::User, &user.id)?;

		let existing = self.lookup::<User>(DocumentKind::User, &user.id).await;
		self.policy.merge_user(&mut user, existing.as_ref())?;

		persist_doc(self.store.as_ref(), DocumentKind::User, &user.id, &user).await?;
		tracing::info!(user_id = %user.id, "user upserted");
		Ok(user.redacted())
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_user(&self, id: &str) -> Result<User> {
		self.get_redacted(DocumentKind::User, id).await
	}

	#[tracing::instrument(skip(self, query))]
	pub async fn search_users(&self, query: &Value) -> Result<Vec<User>> {
		let users: Vec<User> = search_docs(self.store.as_ref(), DocumentKind::User, query).await?;
		Ok(users.redacted())
	}

	/// Verify a user's password.
	///
	/// Returns `None` if the user does not exist. An inactive user never
	/// authenticates.
	#[tracing::instrument(skip(self, credentials), fields(user_id = %credentials.id))]
	pub async fn authenticate(&self, credentials: &Credentials) -> Result<Option<Authentication>> {
		let Some(user) = fetch_doc::<User>(self.store.as_ref(), DocumentKind::User, &credentials.id).await?
		else {
			tracing::warn!(user_id = %credentials.id, "authentication for unknown user");
			return Ok(None);
		};

		let verified = self
			.policy
			.codec()
			.verify(&user.password, credentials.password.expose());
		let authenticated = verified && user.active;
		if !authenticated {
			tracing::info!(user_id = %user.id, active = user.active, "authentication failed");
		}

		Ok(Some(Authentication {
			user: user.redacted(),
			authenticated,
		}))
	}

	// =========================================================================
	// Access checks
	// =========================================================================

	/// Evaluate an access check for the user carried by `claims`.
	pub fn user_has_access(
		&self,
		claims: Option<&TokenClaims>,
		check: AccessCheck,
		now: DateTime<Utc>,
	) -> Result<AccessCheckResult> {
		let user = prov_server_auth::acting_user(claims, now)?;
		Ok(check_access(&user, check))
	}

	/// Evaluate an admin access check for the user carried by `claims`.
	pub fn user_has_admin_access(
		&self,
		claims: Option<&TokenClaims>,
		check: AccessCheck,
		now: DateTime<Utc>,
	) -> Result<AccessCheckResult> {
		let user = prov_server_auth::acting_user(claims, now)?;
		Ok(check_admin_access(&user, check))
	}

	// =========================================================================
	// Accounts
	// =========================================================================

	/// Create or replace an account. `parent` is taken from the request.
	///
	/// Returns the persisted account, redacted.
	pub async fn upsert_account(&self, account: Account) -> Result<Account> {
		self.upsert_account_scoped(UpsertScope::Unscoped, account).await
	}

	#[tracing::instrument(skip(self, account), fields(account_id = %account.id))]
	async fn upsert_account_scoped(&self, scope: UpsertScope<'_>, mut account: Account) -> Result<Account> {
		Self::require_id(DocumentKind::Account, &account.id)?;

		let existing = self
			.lookup::<Account>(DocumentKind::Account, &account.id)
			.await;

		apply_scope(scope, &mut account, existing.as_ref())?;
		self.policy
			.merge_account_keys(&mut account, existing.as_ref())?;
		if let Lookup::Found(stored) = &existing {
			account.org_id = stored.org_id;
		}

		persist_doc(self.store.as_ref(), DocumentKind::Account, &account.id, &account).await?;
		tracing::info!(account_id = %account.id, parent = %account.parent, "account upserted");
		Ok(account.redacted())
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_account(&self, id: &str) -> Result<Account> {
		self.get_redacted(DocumentKind::Account, id).await
	}

	#[tracing::instrument(skip(self, query))]
	pub async fn search_accounts(&self, query: &Value) -> Result<Vec<Account>> {
		let accounts: Vec<Account> =
			search_docs(self.store.as_ref(), DocumentKind::Account, query).await?;
		Ok(accounts.redacted())
	}

	/// Check a plaintext access key against an account.
	///
	/// True only if the account exists and is active, and a key with the
	/// given name exists, is active and verifies.
	#[tracing::instrument(
		skip(self, check),
		fields(account_id = %check.account_id, key_name = %check.key_name)
	)]
	pub async fn check_key(&self, check: &KeyCheck) -> Result<bool> {
		let Some(account) =
			fetch_doc::<Account>(self.store.as_ref(), DocumentKind::Account, &check.account_id).await?
		else {
			tracing::debug!("account not found");
			return Ok(false);
		};

		if !account.active {
			tracing::debug!("account inactive");
			return Ok(false);
		}

		let Some(key) = account.access_key(&check.key_name) else {
			tracing::debug!("no key with that name");
			return Ok(false);
		};

		Ok(key.active && self.policy.codec().verify(&key.key, check.key.expose()))
	}

	// =========================================================================
	// Assets
	// =========================================================================

	#[tracing::instrument(skip(self, asset), fields(asset_id = %asset.id))]
	pub async fn upsert_asset(&self, asset: Asset) -> Result<Asset> {
		Self::require_id(DocumentKind::Asset, &asset.id)?;
		persist_doc(self.store.as_ref(), DocumentKind::Asset, &asset.id, &asset).await?;
		tracing::info!(asset_id = %asset.id, routes = asset.routes.len(), "asset upserted");
		Ok(asset)
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_asset(&self, id: &str) -> Result<Asset> {
		fetch_doc(self.store.as_ref(), DocumentKind::Asset, id)
			.await?
			.ok_or_else(|| ProvisioningError::not_found(DocumentKind::Asset, id))
	}

	#[tracing::instrument(skip(self, query))]
	pub async fn search_assets(&self, query: &Value) -> Result<Vec<Asset>> {
		Ok(search_docs(self.store.as_ref(), DocumentKind::Asset, query).await?)
	}

	// =========================================================================
	// Parent-scoped operations
	// =========================================================================

	/// Fetch an account that must be `parent_id` itself or a direct child.
	#[tracing::instrument(skip(self))]
	pub async fn adm_get_account(&self, parent_id: &str, account_id: &str) -> Result<Account> {
		Self::require_id(DocumentKind::Account, parent_id)?;
		let stored = self
			.existing::<Account>(DocumentKind::Account, account_id)
			.await?;
		ensure_self_or_child(parent_id, account_id, stored.as_ref())?;

		stored
			.map(Redact::redacted)
			.ok_or_else(|| ProvisioningError::not_found(DocumentKind::Account, account_id))
	}

	/// Create or replace a child account of `parent_id`.
	///
	/// A new account is attached to `parent_id`; an existing one must
	/// already belong to it.
	pub async fn adm_upsert_child_account(&self, parent_id: &str, account: Account) -> Result<Account> {
		Self::require_id(DocumentKind::Account, parent_id)?;
		self.upsert_account_scoped(UpsertScope::Parent(parent_id), account)
			.await
	}

	/// List the direct children of `parent_id`.
	#[tracing::instrument(skip(self))]
	pub async fn adm_children(&self, parent_id: &str) -> Result<Vec<Account>> {
		Self::require_id(DocumentKind::Account, parent_id)?;
		self.search_accounts(&keyword_term("parent", parent_id)).await
	}

	/// List assets with a route to `account_id`, which must be `parent_id`
	/// itself or a direct child.
	#[tracing::instrument(skip(self))]
	pub async fn adm_assets(&self, parent_id: &str, account_id: &str) -> Result<Vec<Asset>> {
		Self::require_id(DocumentKind::Account, parent_id)?;
		let stored = self
			.existing::<Account>(DocumentKind::Account, account_id)
			.await?;
		ensure_self_or_child(parent_id, account_id, stored.as_ref())?;

		self.search_assets(&keyword_term("routes.account_id", account_id))
			.await
	}

	/// Move an asset's routes between two accounts under `parent_id`.
	///
	/// Returns the updated asset.
	#[tracing::instrument(
		skip(self, association),
		fields(
			asset_id = %association.asset_id,
			from = %association.from_account_id,
			to = %association.to_account_id,
		)
	)]
	pub async fn adm_reassociate_asset(
		&self,
		parent_id: &str,
		association: &AssetAssociation,
	) -> Result<Asset> {
		Self::require_id(DocumentKind::Account, parent_id)?;
		Self::require_id(DocumentKind::Asset, &association.asset_id)?;

		let from = self
			.existing::<Account>(DocumentKind::Account, &association.from_account_id)
			.await?;
		let to = self
			.existing::<Account>(DocumentKind::Account, &association.to_account_id)
			.await?;
		let mut asset = self
			.existing::<Asset>(DocumentKind::Asset, &association.asset_id)
			.await?
			.ok_or_else(|| ProvisioningError::not_found(DocumentKind::Asset, &association.asset_id))?;

		let moved = reassociate_asset(parent_id, association, from.as_ref(), to.as_ref(), &mut asset)?;

		persist_doc(self.store.as_ref(), DocumentKind::Asset, &asset.id, &asset).await?;
		tracing::info!(asset_id = %asset.id, moved, "asset reassociated");
		Ok(asset)
	}
}
