// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use prov_server_auth::{AccessKey, Account, HashingConfig, SecretCodec, User};
use prov_server_provisioning::ProvisioningService;
use prov_server_store::{DocumentKind, DocumentStore, MemoryStore, StoreError};
use serde_json::Value;

pub fn codec() -> SecretCodec {
	SecretCodec::new(&HashingConfig::for_tests()).unwrap()
}

pub fn service() -> (ProvisioningService, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::new("test_"));
	(ProvisioningService::new(store.clone(), codec()), store)
}

pub fn failing_service() -> (ProvisioningService, Arc<FailingStore>) {
	let store = Arc::new(FailingStore::default());
	(ProvisioningService::new(store.clone(), codec()), store)
}

pub fn user(id: &str, password: &str) -> User {
	User {
		id: id.to_string(),
		active: true,
		password: password.to_string(),
		..Default::default()
	}
}

pub fn account(id: &str, parent: &str) -> Account {
	Account {
		id: id.to_string(),
		parent: parent.to_string(),
		active: true,
		..Default::default()
	}
}

pub fn key(name: &str, value: &str) -> AccessKey {
	AccessKey {
		name: name.to_string(),
		key: value.to_string(),
		active: true,
		..Default::default()
	}
}

/// A store whose reads fail with a 503 and whose writes are recorded.
#[derive(Default)]
pub struct FailingStore {
	pub writes: tokio::sync::Mutex<Vec<(DocumentKind, String)>>,
}

#[async_trait]
impl DocumentStore for FailingStore {
	fn index_prefix(&self) -> &str {
		"failing_"
	}

	async fn fetch(&self, _kind: DocumentKind, _id: &str) -> Result<Option<Value>, StoreError> {
		Err(StoreError::Backend {
			status: 503,
			message: "unavailable".to_string(),
		})
	}

	async fn persist(&self, kind: DocumentKind, id: &str, _doc: &Value) -> Result<(), StoreError> {
		self.writes.lock().await.push((kind, id.to_string()));
		Ok(())
	}

	async fn search(&self, _kind: DocumentKind, _body: &Value) -> Result<Vec<Value>, StoreError> {
		Err(StoreError::Timeout)
	}
}
