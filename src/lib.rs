//! TravelSplit - shared trip expenses, balances and settlements
//!
//! This library is the core of a shared-expense tracker: people form a group,
//! record who paid for what, and get back each member's balance, a short list
//! of transfers that settles everyone, and spending per category.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Groups, members, expenses, money and ids
//! - `ledger`: Pure computations (balances, settlement plan, category totals)
//! - `storage`: The `LedgerStore` contract with Local and Remote backends
//! - `session`: Guest and authenticated sessions, sign-in migration
//! - `services`: Validation, summaries and audited changes on top of a session
//! - `audit`: Append-only audit log
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travelsplit::config::{Settings, SplitPaths};
//! use travelsplit::models::NewGroup;
//! use travelsplit::services::{GroupService, SummaryService};
//! use travelsplit::session::SessionManager;
//! use travelsplit::storage::{InMemoryDocumentStore, JsonFileStorage, LocalLedger};
//!
//! # async fn run() -> travelsplit::LedgerResult<()> {
//! let paths = SplitPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let local = Arc::new(LocalLedger::new(Arc::new(JsonFileStorage::new(paths.data_dir()))));
//! let documents = Arc::new(InMemoryDocumentStore::new());
//! let mut sessions = SessionManager::from_settings(local, documents, &settings);
//!
//! let session = sessions.start_guest()?.clone();
//! let group = GroupService::new(&session).create(NewGroup::new("Lisbon")).await?;
//! let summary = SummaryService::new(&session).summarize(&group.id).await?;
//! println!("{}", settings.format_amount(summary.total));
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
