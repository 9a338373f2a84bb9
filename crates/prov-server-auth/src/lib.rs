// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization and credential lifecycle for provisioning.
//!
//! This crate provides:
//! - [`SecretCodec`]: Argon2id hashing and verification of passwords and access keys
//! - [`CredentialPolicy`]: secret-field resolution for full-replace upserts
//! - [`access`]: pure access decisions over a [`User`] and an [`AccessCheck`]
//! - [`hierarchy`]: parent/child account ownership rules
//! - [`TokenClaims`]: reconstruction of the acting user from verified claims
//!
//! Nothing here talks to the document store. Callers fetch, pass the stored
//! document in, and persist what comes back.

pub mod access;
pub mod argon2_config;
pub mod claims;
pub mod codec;
pub mod credentials;
pub mod error;
pub mod hierarchy;
pub mod types;

pub use access::{check_access, check_admin_access, has_access, has_admin_access, has_basic_access};
pub use argon2_config::HashingConfig;
pub use claims::{acting_user, TokenClaims};
pub use codec::{Redact, SecretCodec, MIN_SECRET_LEN};
pub use credentials::{CredentialPolicy, Lookup};
pub use error::AuthError;
pub use hierarchy::{apply_scope, ensure_self_or_child, is_self_or_child, reassociate_asset, UpsertScope};
pub use types::{
	AccessCheck, AccessCheckResult, AccessKey, Account, Asset, AssetAssociation, Route, User,
};
