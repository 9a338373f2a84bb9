// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning service for users, accounts and assets.
//!
//! Every write is read-merge-write against the document store:
//! - User upserts resolve the password against the stored digest
//! - Account upserts resolve access keys by name, keep the stored `org_id`,
//!   and under a parent scope enforce account ownership
//! - Reads and searches redact every secret before returning
//!
//! Parent-scoped (`adm_*`) operations restrict the caller to its own
//! account and its direct children.

mod error;
mod request;
mod service;

pub use error::ProvisioningError;
pub use request::{Authentication, Credentials, KeyCheck};
pub use service::{ProvisioningService, Result};
