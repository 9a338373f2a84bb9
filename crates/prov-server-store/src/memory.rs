// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::kind::{DocumentKind, DEFAULT_INDEX_PREFIX};
use crate::query::Matcher;
use crate::DocumentStore;

/// A [`DocumentStore`] backed by a map per index.
///
/// Search supports the subset of the query DSL understood by [`Matcher`].
/// Hits come back ordered by id.
#[derive(Debug)]
pub struct MemoryStore {
	index_prefix: String,
	indices: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new(DEFAULT_INDEX_PREFIX)
	}
}

impl MemoryStore {
	pub fn new(index_prefix: impl Into<String>) -> Self {
		Self {
			index_prefix: index_prefix.into(),
			indices: RwLock::new(HashMap::new()),
		}
	}

	/// Number of documents of `kind`.
	pub async fn len(&self, kind: DocumentKind) -> usize {
		let indices = self.indices.read().await;
		indices
			.get(&kind.index(&self.index_prefix))
			.map_or(0, BTreeMap::len)
	}

	pub async fn is_empty(&self, kind: DocumentKind) -> bool {
		self.len(kind).await == 0
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	fn index_prefix(&self) -> &str {
		&self.index_prefix
	}

	async fn fetch(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>> {
		let indices = self.indices.read().await;
		Ok(indices
			.get(&kind.index(&self.index_prefix))
			.and_then(|index| index.get(id))
			.cloned())
	}

	#[instrument(level = "debug", skip(self, doc), fields(kind = %kind))]
	async fn persist(&self, kind: DocumentKind, id: &str, doc: &Value) -> Result<()> {
		let mut indices = self.indices.write().await;
		let replaced = indices
			.entry(kind.index(&self.index_prefix))
			.or_default()
			.insert(id.to_string(), doc.clone())
			.is_some();
		debug!(replaced, "document persisted");
		Ok(())
	}

	async fn search(&self, kind: DocumentKind, body: &Value) -> Result<Vec<Value>> {
		let matcher = Matcher::from_body(body)?;
		let size = body
			.get("size")
			.and_then(Value::as_u64)
			.map_or(usize::MAX, |s| s as usize);

		let indices = self.indices.read().await;
		Ok(indices
			.get(&kind.index(&self.index_prefix))
			.into_iter()
			.flat_map(BTreeMap::values)
			.filter(|doc| matcher.matches(doc))
			.take(size)
			.cloned()
			.collect())
	}
}
