// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use prov_server_store::query::{keyword_term, term};
use prov_server_store::{DocumentKind, DocumentStore, ElasticConfig, ElasticStore, StoreError};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> ElasticStore {
	ElasticStore::new(ElasticConfig {
		url: server.uri(),
		index_prefix: "test_".to_string(),
		..Default::default()
	})
	.unwrap()
}

#[tokio::test]
async fn fetch_returns_source() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/test_user/_doc/u1"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"_index": "test_user",
			"_id": "u1",
			"found": true,
			"_source": { "id": "u1", "active": true }
		})))
		.mount(&server)
		.await;

	let doc = store_for(&server)
		.fetch(DocumentKind::User, "u1")
		.await
		.unwrap();
	assert_eq!(doc, Some(json!({ "id": "u1", "active": true })));
}

#[tokio::test]
async fn fetch_404_is_not_found() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/test_account/_doc/missing"))
		.respond_with(ResponseTemplate::new(404).set_body_json(json!({
			"_index": "test_account",
			"_id": "missing",
			"found": false
		})))
		.mount(&server)
		.await;

	let doc = store_for(&server)
		.fetch(DocumentKind::Account, "missing")
		.await
		.unwrap();
	assert!(doc.is_none());
}

#[tokio::test]
async fn fetch_server_error_is_distinct_from_not_found() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/test_account/_doc/a1"))
		.respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
		.mount(&server)
		.await;

	let result = store_for(&server).fetch(DocumentKind::Account, "a1").await;
	assert!(matches!(
		result,
		Err(StoreError::Backend { status: 503, .. })
	));
}

#[tokio::test]
async fn fetch_garbage_is_invalid_response() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path("/test_asset/_doc/a1"))
		.respond_with(ResponseTemplate::new(200).set_body_string("not json"))
		.mount(&server)
		.await;

	let result = store_for(&server).fetch(DocumentKind::Asset, "a1").await;
	assert!(matches!(result, Err(StoreError::InvalidResponse(_))));
}

#[tokio::test]
async fn persist_puts_full_document() {
	let server = MockServer::start().await;
	let doc = json!({ "id": "a1", "parent": "p1", "access_keys": [] });
	Mock::given(method("PUT"))
		.and(path("/test_account/_doc/a1"))
		.and(body_json(&doc))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
		.expect(1)
		.mount(&server)
		.await;

	store_for(&server)
		.persist(DocumentKind::Account, "a1", &doc)
		.await
		.unwrap();
}

#[tokio::test]
async fn persist_rejection_is_backend_error() {
	let server = MockServer::start().await;
	Mock::given(method("PUT"))
		.and(path("/test_user/_doc/u1"))
		.respond_with(ResponseTemplate::new(400).set_body_string("mapper_parsing_exception"))
		.mount(&server)
		.await;

	let result = store_for(&server)
		.persist(DocumentKind::User, "u1", &json!({ "id": "u1" }))
		.await;
	match result {
		Err(StoreError::Backend { status, message }) => {
			assert_eq!(status, 400);
			assert!(message.contains("mapper_parsing_exception"));
		}
		other => panic!("expected backend error, got {other:?}"),
	}
}

#[tokio::test]
async fn search_returns_hit_sources() {
	let server = MockServer::start().await;
	let query = term("parent", "p1");
	Mock::given(method("POST"))
		.and(path("/test_account/_search"))
		.and(body_json(&query))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"took": 1,
			"hits": {
				"total": { "value": 2 },
				"hits": [
					{ "_id": "c1", "_source": { "id": "c1", "parent": "p1" } },
					{ "_id": "c2", "_source": { "id": "c2", "parent": "p1" } }
				]
			}
		})))
		.mount(&server)
		.await;

	let hits = store_for(&server)
		.search(DocumentKind::Account, &query)
		.await
		.unwrap();
	assert_eq!(hits.len(), 2);
	assert_eq!(hits[1]["id"], "c2");
}

#[tokio::test]
async fn keyword_search_posts_subfield_term() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/test_asset/_search"))
		.and(body_json(json!({
			"query": { "term": { "routes.account_id.keyword": "P" } },
			"size": 1000
		})))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"hits": { "hits": [ { "_id": "a1", "_source": { "id": "a1" } } ] }
		})))
		.expect(1)
		.mount(&server)
		.await;

	let hits = store_for(&server)
		.search(DocumentKind::Asset, &keyword_term("routes.account_id", "P"))
		.await
		.unwrap();
	assert_eq!(hits, vec![json!({ "id": "a1" })]);
}
