// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod common;

use chrono::{Duration, Utc};
use common::{codec, failing_service, service, user};
use prov_common_secret::REDACTED;
use prov_server_auth::{AccessCheck, AuthError, TokenClaims, User};
use prov_server_provisioning::{Credentials, ProvisioningError};
use prov_server_store::{fetch_doc, query, DocumentKind};
use serde_json::json;

async fn stored_user(store: &prov_server_store::MemoryStore, id: &str) -> User {
	fetch_doc::<User>(store, DocumentKind::User, id)
		.await
		.unwrap()
		.unwrap()
}

mod upsert {
	use super::*;

	#[tokio::test]
	async fn new_user_needs_a_password() {
		let (service, store) = service();

		let result = service.upsert_user(user("u1", "")).await;
		assert!(matches!(
			result,
			Err(ProvisioningError::Auth(AuthError::MissingSecret { .. }))
		));

		let result = service.upsert_user(user("u1", "short")).await;
		assert!(matches!(
			result,
			Err(ProvisioningError::Auth(AuthError::WeakSecret { .. }))
		));
		assert!(store.is_empty(DocumentKind::User).await);
	}

	#[tokio::test]
	async fn new_user_is_stored_hashed_and_returned_redacted() {
		let (service, store) = service();

		let returned = service.upsert_user(user("u1", "longenoughpw")).await.unwrap();
		assert_eq!(returned.password, REDACTED);

		let stored = stored_user(&store, "u1").await;
		assert_ne!(stored.password, "longenoughpw");
		assert!(codec().verify(&stored.password, "longenoughpw"));
	}

	#[tokio::test]
	async fn redacted_echo_keeps_the_stored_digest() {
		let (service, store) = service();
		service.upsert_user(user("u1", "longenoughpw")).await.unwrap();
		let digest = stored_user(&store, "u1").await.password;

		let mut echoed = service.get_user("u1").await.unwrap();
		echoed.display_name = "Renamed".to_string();
		service.upsert_user(echoed).await.unwrap();

		let stored = stored_user(&store, "u1").await;
		assert_eq!(stored.password, digest);
		assert_eq!(stored.display_name, "Renamed");
	}

	#[tokio::test]
	async fn empty_id_is_invalid() {
		let (service, _) = service();
		let result = service.upsert_user(user("  ", "longenoughpw")).await;
		assert!(matches!(result, Err(ProvisioningError::InvalidRequest(_))));
	}

	#[tokio::test]
	async fn lookup_failure_aborts_without_writing() {
		let (service, store) = failing_service();

		let result = service.upsert_user(user("u1", "longenoughpw")).await;
		assert!(matches!(
			result,
			Err(ProvisioningError::Auth(AuthError::BackingStore(_)))
		));
		assert!(store.writes.lock().await.is_empty());
	}
}

mod reads {
	use super::*;

	#[tokio::test]
	async fn get_missing_user_is_not_found() {
		let (service, _) = service();
		let err = service.get_user("ghost").await.unwrap_err();
		assert_eq!(err.status_code(), 404);
	}

	#[tokio::test]
	async fn search_results_are_redacted() {
		let (service, _) = service();
		service.upsert_user(user("u1", "longenoughpw")).await.unwrap();
		service.upsert_user(user("u2", "anotherlongpw")).await.unwrap();

		let users = service.search_users(&query::match_all()).await.unwrap();
		assert_eq!(users.len(), 2);
		assert!(users.iter().all(|u| u.password == REDACTED));
	}
}

mod authenticate {
	use super::*;

	#[tokio::test]
	async fn correct_password_authenticates() {
		let (service, _) = service();
		service.upsert_user(user("u1", "longenoughpw")).await.unwrap();

		let auth = service
			.authenticate(&Credentials::new("u1", "longenoughpw"))
			.await
			.unwrap()
			.unwrap();
		assert!(auth.authenticated);
		assert_eq!(auth.user.password, REDACTED);
	}

	#[tokio::test]
	async fn wrong_password_does_not() {
		let (service, _) = service();
		service.upsert_user(user("u1", "longenoughpw")).await.unwrap();

		let auth = service
			.authenticate(&Credentials::new("u1", "wrongpassword"))
			.await
			.unwrap()
			.unwrap();
		assert!(!auth.authenticated);
	}

	#[tokio::test]
	async fn unknown_user_is_none() {
		let (service, _) = service();
		let auth = service
			.authenticate(&Credentials::new("ghost", "longenoughpw"))
			.await
			.unwrap();
		assert!(auth.is_none());
	}

	#[tokio::test]
	async fn inactive_user_never_authenticates() {
		let (service, _) = service();
		let mut inactive = user("u1", "longenoughpw");
		inactive.active = false;
		service.upsert_user(inactive).await.unwrap();

		let auth = service
			.authenticate(&Credentials::new("u1", "longenoughpw"))
			.await
			.unwrap()
			.unwrap();
		assert!(!auth.authenticated);
	}

	#[tokio::test]
	async fn store_failure_is_an_error() {
		let (service, _) = failing_service();
		let result = service
			.authenticate(&Credentials::new("u1", "longenoughpw"))
			.await;
		assert!(matches!(result, Err(ProvisioningError::Store(_))));
	}
}

mod access {
	use super::*;

	fn claims(data: serde_json::Value) -> TokenClaims {
		TokenClaims {
			data: Some(data),
			valid: true,
			exp: (Utc::now() + Duration::minutes(5)).timestamp(),
		}
	}

	#[test]
	fn missing_section_is_denied() {
		let (service, _) = service();
		let claims = claims(json!({
			"id": "u1",
			"active": true,
			"accounts": ["acct1"],
			"sections": ["s1"]
		}));
		let check = AccessCheck::new().account("acct1").section("s1").section("s2");

		let result = service
			.user_has_access(Some(&claims), check.clone(), Utc::now())
			.unwrap();
		assert!(!result.status);
		assert_eq!(result.access_check, check);
	}

	#[test]
	fn admin_access_for_single_account() {
		let (service, _) = service();
		let claims = claims(json!({"id": "u1", "active": true, "admin_accounts": ["acct1"]}));

		let result = service
			.user_has_admin_access(Some(&claims), AccessCheck::new().account("acct1"), Utc::now())
			.unwrap();
		assert!(result.status);
	}

	#[test]
	fn missing_claims_are_an_error() {
		let (service, _) = service();
		let err = service
			.user_has_access(None, AccessCheck::new(), Utc::now())
			.unwrap_err();
		assert_eq!(err.status_code(), 401);
	}
}

#[test]
fn prefix_comes_from_the_store() {
	let (service, _) = service();
	assert_eq!(service.index_prefix(), "test_");
}
