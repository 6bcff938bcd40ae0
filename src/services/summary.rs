//! Group summaries
//!
//! Takes one snapshot of a group and its expenses and runs the whole
//! derivation pipeline over it: balances, settlement transfers, category
//! totals and the overall total.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{self, Balances, CategoryTotal, Transfer};
use crate::models::{Expense, Group, GroupId, Money};
use crate::session::Session;
use crate::storage::LedgerStore;

/// Everything derived from one snapshot of a group
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub group: Group,
    /// Newest first
    pub expenses: Vec<Expense>,
    pub balances: Balances,
    pub transfers: Vec<Transfer>,
    pub categories: Vec<CategoryTotal>,
    /// Sum of every expense amount
    pub total: Money,
}

impl GroupSummary {
    /// Derive a summary from a snapshot
    pub fn from_snapshot(group: Group, expenses: Vec<Expense>) -> Self {
        let balances = ledger::compute(&group.members, &expenses);
        let transfers = ledger::plan(&balances);
        let categories = ledger::aggregate(&expenses);
        let total = expenses.iter().map(|e| e.amount).sum();

        Self {
            group,
            expenses,
            balances,
            transfers,
            categories,
            total,
        }
    }

    /// Check whether nobody owes anything
    pub fn is_settled(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// Builds summaries from the active session's store
pub struct SummaryService<'a> {
    session: &'a Session,
}

impl<'a> SummaryService<'a> {
    /// Create a summary service for `session`
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Read the group and its expenses and derive a summary
    pub async fn summarize(&self, group_id: &GroupId) -> LedgerResult<GroupSummary> {
        let store = self.session.store();
        let group = store
            .find_group(group_id)
            .await?
            .ok_or_else(|| LedgerError::group_not_found(group_id.as_str()))?;
        let expenses = store.list_expenses(group_id).await?;

        tracing::debug!(group_id = %group_id, expenses = expenses.len(), "summarizing group");
        Ok(GroupSummary::from_snapshot(group, expenses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, NewExpense, NewGroup};
    use crate::services::{ExpenseService, GroupService};
    use crate::storage::{LocalLedger, MemoryStorage};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summary_end_to_end() {
        let session = Session::Local(Arc::new(LocalLedger::new(Arc::new(MemoryStorage::new()))));
        let groups = GroupService::new(&session);
        let expenses = ExpenseService::new(&session);

        let group = groups.create(NewGroup::new("Lisbon")).await.unwrap();
        for name in ["Ana", "Luis", "Marta"] {
            groups.add_member(&group.id, name).await.unwrap();
        }
        for (payer, cents, category) in [("Ana", 3000, "Food"), ("Luis", 1500, "Vehicle")] {
            expenses
                .add(NewExpense::new(
                    group.id.clone(),
                    payer,
                    Money::from_cents(cents),
                    "x",
                    category,
                ))
                .await
                .unwrap();
        }

        let summary = SummaryService::new(&session).summarize(&group.id).await.unwrap();
        assert_eq!(summary.total, Money::from_cents(4500));
        assert_eq!(summary.balances.get("Ana"), Some(Money::from_cents(1500)));
        assert_eq!(summary.balances.get("Luis"), Some(Money::zero()));
        assert_eq!(summary.balances.get("Marta"), Some(Money::from_cents(-1500)));
        assert_eq!(
            summary.transfers,
            vec![Transfer {
                from: "Marta".into(),
                to: "Ana".into(),
                amount: Money::from_cents(1500),
            }]
        );
        assert_eq!(summary.categories.len(), 2);
        assert!(!summary.is_settled());
    }

    #[tokio::test]
    async fn test_unknown_group() {
        let session = Session::Local(Arc::new(LocalLedger::new(Arc::new(MemoryStorage::new()))));
        let err = SummaryService::new(&session)
            .summarize(&GroupId::from_key("ghost"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_one_cent_debts_keep_group_unsettled() {
        let mut group = Group::new(GroupId::from_key("g"), NewGroup::new("Snacks"));
        group.members = vec!["A".into(), "B".into(), "C".into()];
        let gum = Expense::from_new(
            ExpenseId::new(),
            NewExpense::new(group.id.clone(), "A", Money::from_cents(3), "Gum", "Food"),
        );

        let summary = GroupSummary::from_snapshot(group, vec![gum]);
        assert!(!summary.is_settled());
        assert_eq!(summary.transfers.len(), 2);
    }

    #[test]
    fn test_empty_group_is_settled() {
        let group = Group::new(GroupId::from_key("g"), NewGroup::new("Empty"));
        let summary = GroupSummary::from_snapshot(group, Vec::new());
        assert!(summary.is_settled());
        assert!(summary.balances.is_empty());
        assert_eq!(summary.total, Money::zero());
    }
}
