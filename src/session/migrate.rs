//! Carry a guest's expenses over to the authenticated ledger
//!
//! Migration is best-effort and at-least-once: each local expense is created
//! remotely on its own, a failure is logged and recorded without stopping the
//! run, and nothing guards against a retry producing duplicates.

use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;
use crate::models::ExpenseId;
use crate::storage::{LocalLedger, RemoteLedger};

/// What to do with the local expense collection once migration has run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearPolicy {
    /// Clear everything, including expenses that failed to migrate
    Unconditional,
    /// Keep only the expenses that failed, so a later sign-in retries them
    #[default]
    RetainFailed,
}

/// One expense that could not be migrated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFailure {
    /// Local id of the expense
    pub expense_id: ExpenseId,
    /// Error reported by the remote store
    pub reason: String,
}

/// Outcome of a migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Local expenses found
    pub attempted: usize,
    /// Expenses created remotely
    pub migrated: usize,
    /// Expenses that failed, in local order
    pub failures: Vec<MigrationFailure>,
}

impl MigrationReport {
    /// Check whether every expense made it across
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Moves local expenses into a remote ledger
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionMigrator {
    policy: ClearPolicy,
}

impl SessionMigrator {
    /// Create a migrator with the given clear policy
    pub fn new(policy: ClearPolicy) -> Self {
        Self { policy }
    }

    /// The configured clear policy
    pub fn policy(&self) -> ClearPolicy {
        self.policy
    }

    /// Copy every local expense into `remote`, then clear the local collection
    pub async fn migrate(
        &self,
        local: &LocalLedger,
        remote: &RemoteLedger,
    ) -> LedgerResult<MigrationReport> {
        let expenses = local.all_expenses().await?;
        if expenses.is_empty() {
            return Ok(MigrationReport::default());
        }

        let mut report = MigrationReport {
            attempted: expenses.len(),
            ..MigrationReport::default()
        };
        let mut moved = Vec::with_capacity(expenses.len());

        for expense in expenses {
            let local_id = expense.id.clone();
            match remote.import_expense(expense).await {
                Ok(remote_id) => {
                    tracing::debug!(
                        local_id = %local_id,
                        remote_id = %remote_id,
                        "migrated expense"
                    );
                    report.migrated += 1;
                    moved.push(local_id);
                }
                Err(e) => {
                    tracing::warn!(expense_id = %local_id, error = %e, "failed to migrate expense");
                    report.failures.push(MigrationFailure {
                        expense_id: local_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        match self.policy {
            ClearPolicy::Unconditional => local.clear_expenses().await?,
            ClearPolicy::RetainFailed => local.remove_expenses(&moved).await?,
        }

        tracing::info!(
            uid = %remote.identity().uid,
            attempted = report.attempted,
            migrated = report.migrated,
            failed = report.failures.len(),
            "guest expenses migrated"
        );
        Ok(report)
    }
}
