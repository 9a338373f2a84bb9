// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod common;

use common::{account, codec, failing_service, key, service};
use prov_common_secret::REDACTED;
use prov_server_auth::{Account, AuthError};
use prov_server_provisioning::{KeyCheck, ProvisioningError};
use prov_server_store::{fetch_doc, persist_doc, query, DocumentKind, MemoryStore};

async fn stored_account(store: &MemoryStore, id: &str) -> Account {
	fetch_doc::<Account>(store, DocumentKind::Account, id)
		.await
		.unwrap()
		.unwrap()
}

mod upsert {
	use super::*;

	#[tokio::test]
	async fn keys_are_hashed_and_returned_redacted() {
		let (service, store) = service();
		let mut acct = account("acct1", "");
		acct.access_keys = vec![key("ingest", "ingest-key-0001")];

		let returned = service.upsert_account(acct).await.unwrap();
		assert_eq!(returned.access_keys[0].key, REDACTED);

		let stored = stored_account(&store, "acct1").await;
		assert!(codec().verify(&stored.access_keys[0].key, "ingest-key-0001"));
	}

	#[tokio::test]
	async fn reordered_redacted_keys_keep_their_own_digests() {
		let (service, store) = service();
		let mut acct = account("acct1", "");
		acct.access_keys = vec![key("ingest", "ingest-key-0001"), key("query", "query-key-00002")];
		service.upsert_account(acct).await.unwrap();

		let mut echoed = service.get_account("acct1").await.unwrap();
		echoed.access_keys.reverse();
		service.upsert_account(echoed).await.unwrap();

		let stored = stored_account(&store, "acct1").await;
		let ingest = stored.access_key("ingest").unwrap();
		let query = stored.access_key("query").unwrap();
		assert!(codec().verify(&ingest.key, "ingest-key-0001"));
		assert!(codec().verify(&query.key, "query-key-00002"));
	}

	#[tokio::test]
	async fn stored_org_id_is_preserved() {
		let (service, store) = service();
		let mut acct = account("acct1", "");
		acct.org_id = 42;
		persist_doc(&*store, DocumentKind::Account, "acct1", &acct)
			.await
			.unwrap();

		let mut update = account("acct1", "");
		update.org_id = 7;
		update.display_name = "Updated".to_string();
		let returned = service.upsert_account(update).await.unwrap();

		assert_eq!(returned.org_id, 42);
		assert_eq!(stored_account(&store, "acct1").await.org_id, 42);
	}

	#[tokio::test]
	async fn unscoped_upsert_takes_parent_verbatim() {
		let (service, store) = service();
		service.upsert_account(account("acct1", "p1")).await.unwrap();
		service.upsert_account(account("acct1", "")).await.unwrap();
		assert_eq!(stored_account(&store, "acct1").await.parent, "");
	}

	#[tokio::test]
	async fn lookup_failure_aborts_even_without_keys() {
		let (service, store) = failing_service();
		let result = service.upsert_account(account("acct1", "")).await;
		assert!(matches!(
			result,
			Err(ProvisioningError::Auth(AuthError::BackingStore(_)))
		));
		assert!(store.writes.lock().await.is_empty());
	}
}

mod search {
	use super::*;

	#[tokio::test]
	async fn results_are_redacted() {
		let (service, _) = service();
		let mut acct = account("acct1", "");
		acct.access_keys = vec![key("ingest", "ingest-key-0001")];
		service.upsert_account(acct).await.unwrap();

		let found = service
			.search_accounts(&query::term("id", "acct1"))
			.await
			.unwrap();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].access_keys[0].key, REDACTED);
	}

	#[tokio::test]
	async fn store_failure_is_an_error() {
		let (service, _) = failing_service();
		let result = service.search_accounts(&query::match_all()).await;
		assert!(matches!(result, Err(ProvisioningError::Store(_))));
	}
}

mod key_check {
	use super::*;

	async fn seeded() -> prov_server_provisioning::ProvisioningService {
		let (service, _) = service();
		let mut acct = account("acct1", "");
		let mut disabled = key("old", "old-key-000001");
		disabled.active = false;
		acct.access_keys = vec![key("ingest", "ingest-key-0001"), disabled];
		service.upsert_account(acct).await.unwrap();
		service
	}

	#[tokio::test]
	async fn matching_active_key_passes() {
		let service = seeded().await;
		let ok = service
			.check_key(&KeyCheck::new("acct1", "ingest", "ingest-key-0001"))
			.await
			.unwrap();
		assert!(ok);
	}

	#[tokio::test]
	async fn wrong_key_fails() {
		let service = seeded().await;
		let ok = service
			.check_key(&KeyCheck::new("acct1", "ingest", "not-the-right-key"))
			.await
			.unwrap();
		assert!(!ok);
	}

	#[tokio::test]
	async fn inactive_key_fails() {
		let service = seeded().await;
		let ok = service
			.check_key(&KeyCheck::new("acct1", "old", "old-key-000001"))
			.await
			.unwrap();
		assert!(!ok);
	}

	#[tokio::test]
	async fn unknown_key_or_account_fails() {
		let service = seeded().await;
		assert!(!service
			.check_key(&KeyCheck::new("acct1", "missing", "ingest-key-0001"))
			.await
			.unwrap());
		assert!(!service
			.check_key(&KeyCheck::new("ghost", "ingest", "ingest-key-0001"))
			.await
			.unwrap());
	}

	#[tokio::test]
	async fn inactive_account_fails() {
		let service = seeded().await;
		let mut acct = service.get_account("acct1").await.unwrap();
		acct.active = false;
		service.upsert_account(acct).await.unwrap();

		let ok = service
			.check_key(&KeyCheck::new("acct1", "ingest", "ingest-key-0001"))
			.await
			.unwrap();
		assert!(!ok);
	}
}
