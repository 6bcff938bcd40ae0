//! Remote ledger backend for authenticated sessions
//!
//! Groups and expenses are documents in the `groups` and `expenses`
//! collections of a `DocumentStore`. The document key is the record id and
//! is never stored inside the document body.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    member, Expense, ExpenseId, Group, GroupId, Identity, NewExpense, NewGroup, UNNAMED_GROUP,
};

use super::document::{Document, DocumentStore, FieldFilter, StoredDocument};
use super::LedgerStore;

/// Collection holding group documents
pub const GROUPS_COLLECTION: &str = "groups";
/// Collection holding expense documents
pub const EXPENSES_COLLECTION: &str = "expenses";

const MEMBERS_FIELD: &str = "members";

/// Ledger stored in a shared document store on behalf of one identity
pub struct RemoteLedger {
    docs: Arc<dyn DocumentStore>,
    identity: Identity,
}

impl RemoteLedger {
    /// Create a ledger acting as `identity`
    pub fn new(docs: Arc<dyn DocumentStore>, identity: Identity) -> Self {
        Self { docs, identity }
    }

    /// The identity stamped on new expenses
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Get the underlying document store
    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.docs
    }

    /// Store an already-stamped expense, keeping its `createdAt`
    ///
    /// The incoming id is discarded; the store assigns a new key and the
    /// record is attributed to this ledger's identity. Used when carrying a
    /// guest's expenses over after sign-in.
    pub async fn import_expense(&self, mut expense: Expense) -> LedgerResult<ExpenseId> {
        expense.owner_id = Some(self.identity.uid.clone());
        let body = to_document(&expense)?;
        let key = self.docs.create(EXPENSES_COLLECTION, body).await?;
        Ok(ExpenseId::from_key(key))
    }

    async fn load_group(&self, group_id: &GroupId) -> LedgerResult<Option<Group>> {
        let Some(body) = self.docs.get(GROUPS_COLLECTION, group_id.as_str()).await? else {
            return Ok(None);
        };
        Ok(Some(from_document(group_id.as_str(), body)?))
    }
}

/// Serialize a record into a document body without its `id`
fn to_document<T: Serialize>(record: &T) -> LedgerResult<Document> {
    match serde_json::to_value(record)? {
        Value::Object(mut body) => {
            body.remove("id");
            Ok(body)
        }
        _ => Err(LedgerError::Json(
            "record did not serialize to an object".into(),
        )),
    }
}

/// Rebuild a record from a document body and its key
fn from_document<T: DeserializeOwned>(key: &str, mut body: Document) -> LedgerResult<T> {
    body.insert("id".into(), Value::String(key.to_string()));
    Ok(serde_json::from_value(Value::Object(body))?)
}

/// Decode listed documents, skipping any that don't fit the record shape
fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<StoredDocument>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match from_document(&doc.key, doc.data) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    collection,
                    key = %doc.key,
                    error = %e,
                    "skipping malformed document"
                );
                None
            }
        })
        .collect()
}

#[async_trait]
impl LedgerStore for RemoteLedger {
    async fn create_group(&self, input: NewGroup) -> LedgerResult<Group> {
        let mut group = Group::new(GroupId::from_key(""), input);
        let key = self
            .docs
            .create(GROUPS_COLLECTION, to_document(&group)?)
            .await?;
        group.id = GroupId::from_key(key);

        tracing::debug!(group_id = %group.id, "created remote group");
        Ok(group)
    }

    async fn list_groups(&self) -> LedgerResult<Vec<Group>> {
        let docs = self.docs.list(GROUPS_COLLECTION, None).await?;
        let mut groups: Vec<Group> = decode_all(GROUPS_COLLECTION, docs);
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(groups)
    }

    async fn delete_group(&self, group_id: &GroupId) -> LedgerResult<()> {
        self.docs.delete(GROUPS_COLLECTION, group_id.as_str()).await
    }

    async fn add_member(&self, group_id: &GroupId, name: &str) -> LedgerResult<()> {
        let clean = name.trim();
        if clean.is_empty() {
            return Ok(());
        }

        let Some(group) = self.load_group(group_id).await? else {
            // A membership write against a missing group recreates it
            let healed = Group {
                id: group_id.clone(),
                name: UNNAMED_GROUP.to_string(),
                description: Some(String::new()),
                members: vec![clean.to_string()],
                created_at: Utc::now(),
            };
            tracing::warn!(group_id = %group_id, "group document missing, recreating it");
            return self
                .docs
                .set(GROUPS_COLLECTION, group_id.as_str(), to_document(&healed)?)
                .await;
        };

        if group.has_member(clean) {
            return Ok(());
        }

        self.docs
            .array_union(
                GROUPS_COLLECTION,
                group_id.as_str(),
                MEMBERS_FIELD,
                Value::String(clean.to_string()),
            )
            .await
    }

    async fn remove_member(&self, group_id: &GroupId, name: &str) -> LedgerResult<()> {
        let clean = name.trim();
        if clean.is_empty() {
            return Ok(());
        }

        let Some(group) = self.load_group(group_id).await? else {
            return Ok(());
        };
        let Some(stored) = member::find_member(&group.members, clean) else {
            return Ok(());
        };

        self.docs
            .array_remove(
                GROUPS_COLLECTION,
                group_id.as_str(),
                MEMBERS_FIELD,
                Value::String(stored.to_string()),
            )
            .await
    }

    async fn add_expense(&self, input: NewExpense) -> LedgerResult<Expense> {
        let mut expense = Expense::from_new(ExpenseId::from_key(""), input);
        expense.owner_id = Some(self.identity.uid.clone());

        let key = self
            .docs
            .create(EXPENSES_COLLECTION, to_document(&expense)?)
            .await?;
        expense.id = ExpenseId::from_key(key);

        tracing::debug!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            "created remote expense"
        );
        Ok(expense)
    }

    async fn list_expenses(&self, group_id: &GroupId) -> LedgerResult<Vec<Expense>> {
        let filter = FieldFilter::new("groupId", group_id.as_str());
        let docs = self.docs.list(EXPENSES_COLLECTION, Some(&filter)).await?;
        let mut expenses: Vec<Expense> = decode_all(EXPENSES_COLLECTION, docs);
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(expenses)
    }

    async fn delete_expense(&self, expense_id: &ExpenseId) -> LedgerResult<()> {
        self.docs
            .delete(EXPENSES_COLLECTION, expense_id.as_str())
            .await
    }
}
