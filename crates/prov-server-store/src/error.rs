// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the document store.

use thiserror::Error;

/// Errors returned by a [`DocumentStore`](crate::DocumentStore).
///
/// "Not found" is not an error: fetches return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// The store answered with a non-success status.
	#[error("Store error: {status} - {message}")]
	Backend { status: u16, message: String },

	/// The store answered with a body we could not interpret.
	#[error("Invalid response from store: {0}")]
	InvalidResponse(String),

	/// The query uses a construct the store cannot evaluate.
	#[error("Unsupported query: {0}")]
	UnsupportedQuery(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
