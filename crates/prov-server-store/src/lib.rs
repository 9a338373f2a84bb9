// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Document store for provisioning.
//!
//! Documents are JSON objects kept in one index per [`DocumentKind`]. Every
//! write replaces the whole document; there is no partial update. Callers
//! that need to preserve fields do read-merge-write themselves.
//!
//! Two implementations:
//! - [`ElasticStore`]: Elasticsearch-compatible REST API over reqwest
//! - [`MemoryStore`]: in-process map for tests and local runs

pub mod elastic;
pub mod error;
pub mod kind;
pub mod memory;
pub mod query;

pub use elastic::{ElasticConfig, ElasticStore};
pub use error::{Result, StoreError};
pub use kind::{DocumentKind, DEFAULT_INDEX_PREFIX};
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Raw document access.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Prefix applied to every index name.
	fn index_prefix(&self) -> &str;

	/// Fetches a document by id. A missing document is `Ok(None)`.
	async fn fetch(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>>;

	/// Replaces the document stored under `id`.
	async fn persist(&self, kind: DocumentKind, id: &str, doc: &Value) -> Result<()>;

	/// Runs a search body and returns the matching documents.
	async fn search(&self, kind: DocumentKind, body: &Value) -> Result<Vec<Value>>;
}

/// Fetches and deserializes a document.
pub async fn fetch_doc<T: DeserializeOwned>(
	store: &dyn DocumentStore,
	kind: DocumentKind,
	id: &str,
) -> Result<Option<T>> {
	match store.fetch(kind, id).await? {
		Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
		None => Ok(None),
	}
}

/// Serializes and persists a document.
pub async fn persist_doc<T: Serialize + Sync>(
	store: &dyn DocumentStore,
	kind: DocumentKind,
	id: &str,
	doc: &T,
) -> Result<()> {
	let value = serde_json::to_value(doc)?;
	store.persist(kind, id, &value).await
}

/// Runs a search and deserializes every hit.
pub async fn search_docs<T: DeserializeOwned>(
	store: &dyn DocumentStore,
	kind: DocumentKind,
	body: &Value,
) -> Result<Vec<T>> {
	store
		.search(kind, body)
		.await?
		.into_iter()
		.map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
		.collect()
}
