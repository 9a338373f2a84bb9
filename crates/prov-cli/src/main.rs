// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! prov - operator CLI for the provisioning service
//!
//! Loads server configuration, connects to the document store and runs a
//! single provisioning operation, printing the result as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prov_common_secret::SecretString;
use prov_server_auth::{AccessCheck, Account, Asset, AssetAssociation, SecretCodec, TokenClaims, User};
use prov_server_config::{load_config, load_config_with_file, LogFormat, LoggingConfig, ServerConfig};
use prov_server_provisioning::{Credentials, KeyCheck, ProvisioningService};
use prov_server_store::{query, DocumentStore, ElasticConfig, ElasticStore, MemoryStore};

mod input;

use input::{parse_json, print_json, read_json};

/// prov - manage users, accounts and assets
#[derive(Parser, Debug)]
#[command(name = "prov", version, about, long_about = None)]
struct Args {
	/// Path to custom configuration file
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Log level (overrides config)
	#[arg(short, long)]
	log_level: Option<String>,

	/// Output logs as JSON (overrides config)
	#[arg(long)]
	json_logs: bool,

	/// Use a throwaway in-memory store instead of the configured one
	#[arg(long)]
	memory: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print the configured index prefix
	Prefix,
	/// User documents
	#[command(subcommand)]
	User(UserCommand),
	/// Account documents
	#[command(subcommand)]
	Account(AccountCommand),
	/// Asset documents
	#[command(subcommand)]
	Asset(AssetCommand),
	/// Evaluate an access check for the user in a claim set
	Access {
		/// JSON file with the decoded claim set (`-` for stdin)
		#[arg(long)]
		claims: PathBuf,
		/// Account to assert access to (repeatable)
		#[arg(long = "account")]
		accounts: Vec<String>,
		/// Section to assert access to (repeatable)
		#[arg(long = "section")]
		sections: Vec<String>,
		/// Check admin access instead of member access
		#[arg(long)]
		admin: bool,
	},
	/// Operations scoped to a parent account
	Adm {
		/// The acting parent account
		parent: String,
		#[command(subcommand)]
		command: AdmCommand,
	},
}

#[derive(Subcommand, Debug)]
enum UserCommand {
	/// Fetch a user
	Get { id: String },
	/// Create or replace a user from a JSON document (`-` for stdin)
	Upsert { file: PathBuf },
	/// Search users with a raw query body
	Search {
		#[arg(long)]
		query: Option<String>,
	},
	/// Verify a user's password
	Auth {
		id: String,
		#[arg(long, env = "PROV_PASSWORD", hide_env_values = true)]
		password: String,
	},
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
	/// Fetch an account
	Get { id: String },
	/// Create or replace an account from a JSON document (`-` for stdin)
	Upsert { file: PathBuf },
	/// Search accounts with a raw query body
	Search {
		#[arg(long)]
		query: Option<String>,
	},
	/// Check an access key against an account
	CheckKey {
		account: String,
		name: String,
		#[arg(long, env = "PROV_ACCESS_KEY", hide_env_values = true)]
		key: String,
	},
}

#[derive(Subcommand, Debug)]
enum AssetCommand {
	/// Fetch an asset
	Get { id: String },
	/// Create or replace an asset from a JSON document (`-` for stdin)
	Upsert { file: PathBuf },
	/// Search assets with a raw query body
	Search {
		#[arg(long)]
		query: Option<String>,
	},
}

#[derive(Subcommand, Debug)]
enum AdmCommand {
	/// Fetch the parent itself or one of its children
	Account { id: String },
	/// Create or replace a child account from a JSON document
	UpsertChild { file: PathBuf },
	/// List the parent's children
	Children,
	/// List assets routed to the parent or one of its children
	Assets { account: String },
	/// Move an asset's routes from one account to another
	Reassociate {
		#[arg(long)]
		asset: String,
		#[arg(long)]
		from: String,
		#[arg(long)]
		to: String,
	},
}

fn init_tracing(logging: &LoggingConfig) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Text => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}

fn load(args: &Args) -> Result<ServerConfig> {
	let mut config = match &args.config {
		Some(path) => load_config_with_file(path),
		None => load_config(),
	}
	.context("failed to load configuration")?;

	if let Some(level) = &args.log_level {
		config.logging.level = level.clone();
	}
	if args.json_logs {
		config.logging.format = LogFormat::Json;
	}
	Ok(config)
}

fn connect(config: &ServerConfig, memory: bool) -> Result<Arc<dyn DocumentStore>> {
	if memory {
		info!(prefix = %config.store.index_prefix, "using in-memory store");
		return Ok(Arc::new(MemoryStore::new(&config.store.index_prefix)));
	}

	info!(url = %config.store.url, prefix = %config.store.index_prefix, "connecting to store");
	let store = ElasticStore::new(ElasticConfig::from(&config.store))
		.context("failed to create store client")?;
	Ok(Arc::new(store))
}

fn search_body(query: Option<String>) -> Result<Value> {
	match query {
		Some(q) => parse_json(&q),
		None => Ok(query::match_all()),
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();
	let config = load(&args)?;
	init_tracing(&config.logging);
	debug!(?args.command, "starting");

	let store = connect(&config, args.memory)?;
	let codec = SecretCodec::new(&config.hashing).context("invalid hashing configuration")?;
	let service = ProvisioningService::new(store, codec);

	run(&service, args.command).await
}

async fn run(service: &ProvisioningService, command: Command) -> Result<()> {
	match command {
		Command::Prefix => print_json(&json!({ "prefix": service.index_prefix() })),

		Command::User(cmd) => match cmd {
			UserCommand::Get { id } => print_json(&service.get_user(&id).await?),
			UserCommand::Upsert { file } => {
				let user: User = read_json(&file)?;
				print_json(&service.upsert_user(user).await?)
			}
			UserCommand::Search { query } => {
				print_json(&service.search_users(&search_body(query)?).await?)
			}
			UserCommand::Auth { id, password } => {
				let credentials = Credentials::new(id, SecretString::new(password));
				match service.authenticate(&credentials).await? {
					Some(auth) if auth.authenticated => print_json(&auth),
					Some(_) => anyhow::bail!("invalid credentials"),
					None => anyhow::bail!("user account not found"),
				}
			}
		},

		Command::Account(cmd) => match cmd {
			AccountCommand::Get { id } => print_json(&service.get_account(&id).await?),
			AccountCommand::Upsert { file } => {
				let account: Account = read_json(&file)?;
				print_json(&service.upsert_account(account).await?)
			}
			AccountCommand::Search { query } => {
				print_json(&service.search_accounts(&search_body(query)?).await?)
			}
			AccountCommand::CheckKey { account, name, key } => {
				let check = KeyCheck::new(account, name, SecretString::new(key));
				let valid = service.check_key(&check).await?;
				print_json(&json!({ "valid": valid }))?;
				if !valid {
					anyhow::bail!("access key rejected");
				}
				Ok(())
			}
		},

		Command::Asset(cmd) => match cmd {
			AssetCommand::Get { id } => print_json(&service.get_asset(&id).await?),
			AssetCommand::Upsert { file } => {
				let asset: Asset = read_json(&file)?;
				print_json(&service.upsert_asset(asset).await?)
			}
			AssetCommand::Search { query } => {
				print_json(&service.search_assets(&search_body(query)?).await?)
			}
		},

		Command::Access {
			claims,
			accounts,
			sections,
			admin,
		} => {
			let claims: TokenClaims = read_json(&claims)?;
			let check = AccessCheck { accounts, sections };
			let now = chrono::Utc::now();
			let result = if admin {
				service.user_has_admin_access(Some(&claims), check, now)?
			} else {
				service.user_has_access(Some(&claims), check, now)?
			};
			print_json(&result)
		}

		Command::Adm { parent, command } => match command {
			AdmCommand::Account { id } => print_json(&service.adm_get_account(&parent, &id).await?),
			AdmCommand::UpsertChild { file } => {
				let account: Account = read_json(&file)?;
				print_json(&service.adm_upsert_child_account(&parent, account).await?)
			}
			AdmCommand::Children => print_json(&service.adm_children(&parent).await?),
			AdmCommand::Assets { account } => {
				print_json(&service.adm_assets(&parent, &account).await?)
			}
			AdmCommand::Reassociate { asset, from, to } => {
				let association = AssetAssociation {
					asset_id: asset,
					from_account_id: from,
					to_account_id: to,
				};
				print_json(&service.adm_reassociate_asset(&parent, &association).await?)
			}
		},
	}
}
