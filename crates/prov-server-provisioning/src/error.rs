// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use prov_server_auth::AuthError;
use prov_server_store::{DocumentKind, StoreError};

/// Errors that can occur during provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	#[error("store error: {0}")]
	Store(#[from] StoreError),

	#[error(transparent)]
	Auth(#[from] AuthError),

	#[error("{kind} not found: {id}")]
	NotFound { kind: DocumentKind, id: String },

	#[error("invalid request: {0}")]
	InvalidRequest(String),
}

impl ProvisioningError {
	pub(crate) fn not_found(kind: DocumentKind, id: &str) -> Self {
		ProvisioningError::NotFound {
			kind,
			id: id.to_string(),
		}
	}

	/// Returns true if this error should be logged at error level.
	pub fn is_internal(&self) -> bool {
		match self {
			ProvisioningError::Store(_) => true,
			ProvisioningError::Auth(e) => e.is_internal(),
			ProvisioningError::NotFound { .. } | ProvisioningError::InvalidRequest(_) => false,
		}
	}

	/// Returns the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ProvisioningError::Store(_) => 500,
			ProvisioningError::Auth(e) => e.status_code(),
			ProvisioningError::NotFound { .. } => 404,
			ProvisioningError::InvalidRequest(_) => 400,
		}
	}
}
