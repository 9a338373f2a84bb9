// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Search request bodies in the store's query DSL.
//!
//! Queries are plain JSON so callers can pass through whatever the store
//! understands. [`Matcher`] evaluates the subset the in-memory store
//! supports: `match_all`, `term`, and `bool.must` / `bool.filter` over those.

use serde_json::{json, Value};

use crate::error::{Result, StoreError};

/// Default number of hits requested when the caller does not set `size`.
pub const DEFAULT_SEARCH_SIZE: u64 = 1000;

/// A query matching every document.
pub fn match_all() -> Value {
	json!({ "query": { "match_all": {} }, "size": DEFAULT_SEARCH_SIZE })
}

/// A query matching documents whose `field` equals `value` exactly.
///
/// `field` may be a dotted path into nested objects or arrays of objects,
/// such as `routes.account_id`.
pub fn term(field: &str, value: impl Into<Value>) -> Value {
	json!({
		"query": { "term": { field: value.into() } },
		"size": DEFAULT_SEARCH_SIZE,
	})
}

/// Suffix of the exact-match subfield dynamic mapping adds to string fields.
pub const KEYWORD_SUFFIX: &str = "keyword";

/// A [`term`] query on the `.keyword` subfield of `field`.
///
/// Fields without an explicit mapping are indexed as analysed text, so an
/// exact id match has to go through the keyword subfield.
pub fn keyword_term(field: &str, value: impl Into<Value>) -> Value {
	term(&format!("{field}.{KEYWORD_SUFFIX}"), value)
}

/// Compiled form of the query subset the in-memory store can evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
	All,
	Term { path: Vec<String>, value: Value },
	And(Vec<Matcher>),
}

impl Matcher {
	/// Compiles a full search body (with or without an outer `query` key).
	pub fn from_body(body: &Value) -> Result<Self> {
		match body.get("query") {
			None => Ok(Matcher::All),
			Some(query) => Self::compile(query),
		}
	}

	fn compile(query: &Value) -> Result<Self> {
		let clause = query
			.as_object()
			.filter(|o| o.len() == 1)
			.ok_or_else(|| StoreError::UnsupportedQuery(query.to_string()))?;

		let (name, body) = clause
			.iter()
			.next()
			.ok_or_else(|| StoreError::UnsupportedQuery(query.to_string()))?;

		match name.as_str() {
			"match_all" => Ok(Matcher::All),
			"term" => Self::compile_term(body),
			"bool" => Self::compile_bool(body),
			other => Err(StoreError::UnsupportedQuery(format!("clause {other}"))),
		}
	}

	fn compile_term(body: &Value) -> Result<Self> {
		let (field, value) = body
			.as_object()
			.filter(|o| o.len() == 1)
			.and_then(|o| o.iter().next())
			.ok_or_else(|| StoreError::UnsupportedQuery(format!("term {body}")))?;

		// Long form: { "field": { "value": v } }
		let value = match value {
			Value::Object(inner) => inner
				.get("value")
				.cloned()
				.ok_or_else(|| StoreError::UnsupportedQuery(format!("term {body}")))?,
			other => other.clone(),
		};

		// Documents here are unanalysed, so `field.keyword` is `field`.
		let mut path: Vec<String> = field.split('.').map(str::to_string).collect();
		if path.len() > 1 && path.last().is_some_and(|s| s == KEYWORD_SUFFIX) {
			path.pop();
		}

		Ok(Matcher::Term { path, value })
	}

	fn compile_bool(body: &Value) -> Result<Self> {
		let body = body
			.as_object()
			.ok_or_else(|| StoreError::UnsupportedQuery(format!("bool {body}")))?;

		let mut clauses = Vec::new();
		for (occur, value) in body {
			if occur != "must" && occur != "filter" {
				return Err(StoreError::UnsupportedQuery(format!("bool.{occur}")));
			}
			match value {
				Value::Array(items) => {
					for item in items {
						clauses.push(Self::compile(item)?);
					}
				}
				single => clauses.push(Self::compile(single)?),
			}
		}
		Ok(Matcher::And(clauses))
	}

	pub fn matches(&self, doc: &Value) -> bool {
		match self {
			Matcher::All => true,
			Matcher::Term { path, value } => path_matches(doc, path, value),
			Matcher::And(clauses) => clauses.iter().all(|c| c.matches(doc)),
		}
	}
}

fn path_matches(node: &Value, path: &[String], expected: &Value) -> bool {
	match (node, path.split_first()) {
		(Value::Array(items), _) => items.iter().any(|item| path_matches(item, path, expected)),
		(_, None) => node == expected,
		(Value::Object(map), Some((head, rest))) => map
			.get(head)
			.is_some_and(|child| path_matches(child, rest, expected)),
		_ => false,
	}
}
