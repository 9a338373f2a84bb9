// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Elasticsearch-compatible REST client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, instrument, trace};

use crate::error::{Result, StoreError};
use crate::kind::{DocumentKind, DEFAULT_INDEX_PREFIX};
use crate::DocumentStore;

pub const DEFAULT_URL: &str = "http://elasticsearch:9200";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ElasticStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticConfig {
	pub url: String,
	pub index_prefix: String,
	pub timeout: Duration,
}

impl Default for ElasticConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_URL.to_string(),
			index_prefix: DEFAULT_INDEX_PREFIX.to_string(),
			timeout: DEFAULT_TIMEOUT,
		}
	}
}

/// A [`DocumentStore`] talking to an Elasticsearch-compatible server.
///
/// Requests are sent once; retry is left to the caller.
#[derive(Debug, Clone)]
pub struct ElasticStore {
	http_client: Client,
	base_url: String,
	index_prefix: String,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
	#[serde(default)]
	found: bool,
	#[serde(rename = "_source")]
	source: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
	hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
	#[serde(default)]
	hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
	#[serde(rename = "_source")]
	source: Value,
}

impl ElasticStore {
	pub fn new(config: ElasticConfig) -> Result<Self> {
		let http_client = Client::builder().timeout(config.timeout).build()?;

		Ok(Self {
			http_client,
			base_url: config.url.trim_end_matches('/').to_string(),
			index_prefix: config.index_prefix,
		})
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn doc_url(&self, kind: DocumentKind, id: &str) -> String {
		format!("{}/{}/_doc/{}", self.base_url, kind.index(&self.index_prefix), id)
	}

	fn search_url(&self, kind: DocumentKind) -> String {
		format!("{}/{}/_search", self.base_url, kind.index(&self.index_prefix))
	}

	async fn read_body(response: Response) -> Result<String> {
		response.text().await.map_err(|e| {
			error!(error = %e, "Failed to read response body");
			StoreError::Network(e)
		})
	}

	async fn ensure_success(response: Response) -> Result<Response> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let body = response.text().await.unwrap_or_default();
		error!(status = status.as_u16(), body = %body, "Store returned an error");
		Err(StoreError::Backend {
			status: status.as_u16(),
			message: body,
		})
	}
}

fn map_send_error(e: reqwest::Error) -> StoreError {
	if e.is_timeout() {
		error!("Request timed out");
		return StoreError::Timeout;
	}
	error!(error = %e, "Network error during store request");
	StoreError::Network(e)
}

#[async_trait]
impl DocumentStore for ElasticStore {
	fn index_prefix(&self) -> &str {
		&self.index_prefix
	}

	#[instrument(skip(self), fields(kind = %kind))]
	async fn fetch(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>> {
		let url = self.doc_url(kind, id);
		debug!(url = %url, "Fetching document");

		let response = self
			.http_client
			.get(&url)
			.send()
			.await
			.map_err(map_send_error)?;

		if response.status() == StatusCode::NOT_FOUND {
			debug!("Document not found");
			return Ok(None);
		}

		let response = Self::ensure_success(response).await?;
		let body = Self::read_body(response).await?;
		trace!(body = %body, "Response body");

		let parsed: GetResponse = serde_json::from_str(&body).map_err(|e| {
			error!(error = %e, "Failed to parse get response");
			StoreError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		if !parsed.found {
			return Ok(None);
		}
		parsed
			.source
			.map(Some)
			.ok_or_else(|| StoreError::InvalidResponse("found document has no _source".to_string()))
	}

	#[instrument(skip(self, doc), fields(kind = %kind))]
	async fn persist(&self, kind: DocumentKind, id: &str, doc: &Value) -> Result<()> {
		let url = self.doc_url(kind, id);
		debug!(url = %url, "Persisting document");

		let response = self
			.http_client
			.put(&url)
			.json(doc)
			.send()
			.await
			.map_err(map_send_error)?;

		Self::ensure_success(response).await?;
		Ok(())
	}

	#[instrument(skip(self, body), fields(kind = %kind))]
	async fn search(&self, kind: DocumentKind, body: &Value) -> Result<Vec<Value>> {
		let url = self.search_url(kind);
		debug!(url = %url, "Searching documents");

		let response = self
			.http_client
			.post(&url)
			.json(body)
			.send()
			.await
			.map_err(map_send_error)?;

		let response = Self::ensure_success(response).await?;
		let text = Self::read_body(response).await?;

		let parsed: SearchResponse = serde_json::from_str(&text).map_err(|e| {
			error!(error = %e, "Failed to parse search response");
			StoreError::InvalidResponse(format!("JSON parse error: {e}"))
		})?;

		let hits: Vec<Value> = parsed.hits.hits.into_iter().map(|h| h.source).collect();
		debug!(result_count = hits.len(), "Search completed");
		Ok(hits)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config() {
		let config = ElasticConfig::default();
		assert_eq!(config.url, "http://elasticsearch:9200");
		assert_eq!(config.index_prefix, "system_");
		assert_eq!(config.timeout, Duration::from_secs(10));
	}

	#[test]
	fn urls_use_prefixed_indices() {
		let store = ElasticStore::new(ElasticConfig {
			url: "http://localhost:9200/".to_string(),
			index_prefix: "dev_".to_string(),
			..Default::default()
		})
		.unwrap();

		assert_eq!(store.base_url(), "http://localhost:9200");
		assert_eq!(
			store.doc_url(DocumentKind::Account, "acct1"),
			"http://localhost:9200/dev_account/_doc/acct1"
		);
		assert_eq!(
			store.search_url(DocumentKind::Asset),
			"http://localhost:9200/dev_asset/_search"
		);
	}
}
