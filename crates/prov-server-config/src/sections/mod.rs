// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod hashing;
mod logging;
mod store;

pub use hashing::HashingConfigLayer;
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use prov_server_auth::HashingConfig;
pub use store::{StoreConfig, StoreConfigLayer};
