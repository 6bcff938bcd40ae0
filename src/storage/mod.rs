//! Ledger Store for TravelSplit
//!
//! `LedgerStore` is the backend-agnostic contract for persisting groups and
//! expenses. Two backends implement it:
//!
//! - `LocalLedger`: ephemeral, single-device storage for guest sessions. Whole
//!   collections are read, modified and written back.
//! - `RemoteLedger`: durable storage for authenticated sessions on top of a
//!   `DocumentStore`. Membership edits use the store's atomic array
//!   primitives.
//!
//! A session picks its backend once; callers never branch on the session kind
//! inside individual operations.

pub mod document;
pub mod file_io;
pub mod local;
pub mod local_ledger;
pub mod remote_ledger;

pub use document::{Document, DocumentStore, FieldFilter, InMemoryDocumentStore, StoredDocument};
pub use file_io::{read_text, write_atomic, write_json_atomic};
pub use local::{JsonFileStorage, LocalStorage, MemoryStorage};
pub use local_ledger::LocalLedger;
pub use remote_ledger::RemoteLedger;

use async_trait::async_trait;

use crate::error::LedgerResult;
use crate::models::{Expense, ExpenseId, Group, GroupId, NewExpense, NewGroup};

/// Persistence contract shared by the Local and Remote backends
///
/// Every operation runs to completion or failure; none retries. Member names
/// are trimmed and compared case-insensitively.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Create a group with no members, stamped with the current time
    async fn create_group(&self, input: NewGroup) -> LedgerResult<Group>;

    /// List all groups; malformed member lists read as empty
    async fn list_groups(&self) -> LedgerResult<Vec<Group>>;

    /// Delete a group. Its expenses are left in place.
    async fn delete_group(&self, group_id: &GroupId) -> LedgerResult<()>;

    /// Add a member unless an equal-under-normalization one exists
    async fn add_member(&self, group_id: &GroupId, name: &str) -> LedgerResult<()>;

    /// Remove the stored member matching `name`; missing names are a no-op
    async fn remove_member(&self, group_id: &GroupId, name: &str) -> LedgerResult<()>;

    /// Record an expense, stamping its id and creation time
    async fn add_expense(&self, input: NewExpense) -> LedgerResult<Expense>;

    /// Expenses of one group, newest first
    async fn list_expenses(&self, group_id: &GroupId) -> LedgerResult<Vec<Expense>>;

    /// Delete an expense
    async fn delete_expense(&self, expense_id: &ExpenseId) -> LedgerResult<()>;

    /// Look up a single group
    async fn find_group(&self, group_id: &GroupId) -> LedgerResult<Option<Group>> {
        Ok(self
            .list_groups()
            .await?
            .into_iter()
            .find(|g| &g.id == group_id))
    }
}
