//! Local ledger backend for guest sessions
//!
//! Each collection lives as one JSON array under a fixed key of a
//! `LocalStorage`. Every mutation reads the whole collection, changes it and
//! writes it back; the write lock keeps those cycles from interleaving
//! within a process.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::LedgerResult;
use crate::models::{Expense, ExpenseId, Group, GroupId, GuestProfile, NewExpense, NewGroup};

use super::local::{LocalStorage, EXPENSES_KEY, GROUPS_KEY, GUEST_KEY};
use super::LedgerStore;

/// Ledger stored in a single device's key/value storage
pub struct LocalLedger {
    storage: Arc<dyn LocalStorage>,
    write_lock: Mutex<()>,
}

impl LocalLedger {
    /// Create a ledger over the given storage
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the underlying key/value storage
    pub fn storage(&self) -> &Arc<dyn LocalStorage> {
        &self.storage
    }

    /// Read a collection, degrading malformed data to what can be salvaged
    ///
    /// A missing key, unparsable JSON or a non-array value reads as empty.
    /// Elements that don't deserialize are skipped.
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> LedgerResult<Vec<T>> {
        let Some(text) = self.storage.get_item(key)? else {
            return Ok(Vec::new());
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable local collection, treating as empty");
                return Ok(Vec::new());
            }
        };

        let Value::Array(items) = value else {
            tracing::warn!(key, "local collection is not a list, treating as empty");
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(key, index, error = %e, "skipping malformed local record")
                }
            }
        }
        Ok(records)
    }

    fn write_collection<T: Serialize>(&self, key: &str, records: &[T]) -> LedgerResult<()> {
        let text = serde_json::to_string(records)?;
        self.storage.set_item(key, &text)?;
        tracing::debug!(key, count = records.len(), "wrote local collection");
        Ok(())
    }

    /// Apply `edit` to the group with `group_id` and persist if it changed
    async fn edit_group<F>(&self, group_id: &GroupId, edit: F) -> LedgerResult<()>
    where
        F: FnOnce(&mut Group) -> bool + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut groups: Vec<Group> = self.read_collection(GROUPS_KEY)?;

        let Some(group) = groups.iter_mut().find(|g| &g.id == group_id) else {
            tracing::debug!(group_id = %group_id, "group missing, membership edit ignored");
            return Ok(());
        };

        if edit(group) {
            self.write_collection(GROUPS_KEY, &groups)?;
        }
        Ok(())
    }

    /// Every stored expense, across all groups
    pub async fn all_expenses(&self) -> LedgerResult<Vec<Expense>> {
        self.read_collection(EXPENSES_KEY)
    }

    /// Drop the whole expense collection
    pub async fn clear_expenses(&self) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;
        self.storage.remove_item(EXPENSES_KEY)
    }

    /// Remove the listed expenses, keeping everything else
    pub async fn remove_expenses(&self, ids: &[ExpenseId]) -> LedgerResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let _guard = self.write_lock.lock().await;
        let mut expenses: Vec<Expense> = self.read_collection(EXPENSES_KEY)?;
        let before = expenses.len();
        expenses.retain(|e| !ids.contains(&e.id));

        if expenses.is_empty() {
            self.storage.remove_item(EXPENSES_KEY)
        } else if expenses.len() != before {
            self.write_collection(EXPENSES_KEY, &expenses)
        } else {
            Ok(())
        }
    }

    /// The remembered guest profile, if any
    pub fn guest_profile(&self) -> LedgerResult<Option<GuestProfile>> {
        let Some(text) = self.storage.get_item(GUEST_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable guest profile, ignoring");
                Ok(None)
            }
        }
    }

    /// Remember `profile` as this device's guest
    pub fn remember_guest(&self, profile: &GuestProfile) -> LedgerResult<()> {
        let text = serde_json::to_string(profile)?;
        self.storage.set_item(GUEST_KEY, &text)
    }

    /// Forget the guest profile
    pub fn forget_guest(&self) -> LedgerResult<()> {
        self.storage.remove_item(GUEST_KEY)
    }
}

#[async_trait]
impl LedgerStore for LocalLedger {
    async fn create_group(&self, input: NewGroup) -> LedgerResult<Group> {
        let group = Group::new(GroupId::new(), input);

        let _guard = self.write_lock.lock().await;
        let mut groups: Vec<Group> = self.read_collection(GROUPS_KEY)?;
        groups.push(group.clone());
        self.write_collection(GROUPS_KEY, &groups)?;

        Ok(group)
    }

    async fn list_groups(&self) -> LedgerResult<Vec<Group>> {
        self.read_collection(GROUPS_KEY)
    }

    async fn delete_group(&self, group_id: &GroupId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut groups: Vec<Group> = self.read_collection(GROUPS_KEY)?;
        let before = groups.len();
        groups.retain(|g| &g.id != group_id);

        if groups.len() == before {
            return Ok(());
        }
        self.write_collection(GROUPS_KEY, &groups)
    }

    async fn add_member(&self, group_id: &GroupId, name: &str) -> LedgerResult<()> {
        if name.trim().is_empty() {
            return Ok(());
        }
        self.edit_group(group_id, |g| g.add_member(name)).await
    }

    async fn remove_member(&self, group_id: &GroupId, name: &str) -> LedgerResult<()> {
        if name.trim().is_empty() {
            return Ok(());
        }
        self.edit_group(group_id, |g| g.remove_member(name)).await
    }

    async fn add_expense(&self, input: NewExpense) -> LedgerResult<Expense> {
        let expense = Expense::from_new(ExpenseId::new(), input);

        let _guard = self.write_lock.lock().await;
        let mut expenses: Vec<Expense> = self.read_collection(EXPENSES_KEY)?;
        expenses.push(expense.clone());
        self.write_collection(EXPENSES_KEY, &expenses)?;

        Ok(expense)
    }

    async fn list_expenses(&self, group_id: &GroupId) -> LedgerResult<Vec<Expense>> {
        let mut expenses: Vec<Expense> = self
            .read_collection::<Expense>(EXPENSES_KEY)?
            .into_iter()
            .filter(|e| &e.group_id == group_id)
            .collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    async fn delete_expense(&self, expense_id: &ExpenseId) -> LedgerResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut expenses: Vec<Expense> = self.read_collection(EXPENSES_KEY)?;
        let before = expenses.len();
        expenses.retain(|e| &e.id != expense_id);

        if expenses.len() == before {
            return Ok(());
        }
        self.write_collection(EXPENSES_KEY, &expenses)
    }
}
