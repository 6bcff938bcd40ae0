//! Balance Calculator
//!
//! Derives each member's net position from the group's current membership and
//! its expenses. Positive means the member is owed money, negative means the
//! member owes money. Balances are recomputed from scratch on every call; no
//! state is cached between calls.

use crate::models::{member, Expense, Money};

/// A single member's net position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBalance {
    /// Member name as stored in the group
    pub member: String,
    /// Signed balance
    pub amount: Money,
}

/// Per-member balances in group insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances {
    entries: Vec<MemberBalance>,
}

impl Balances {
    /// Build balances from explicit `(member, amount)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Money)>,
        S: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(member, amount)| MemberBalance {
                    member: member.into(),
                    amount,
                })
                .collect(),
        }
    }

    /// Balance for a member, matched under normalization
    pub fn get(&self, name: &str) -> Option<Money> {
        self.entries
            .iter()
            .find(|e| member::same_member(&e.member, name))
            .map(|e| e.amount)
    }

    /// Iterate in member order
    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no members
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances; within one cent of zero for any computed set
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Sum of what creditors are owed
    pub fn positive_total(&self) -> Money {
        self.entries
            .iter()
            .map(|e| e.amount)
            .filter(Money::is_positive)
            .sum()
    }

    /// Check if every balance is within one cent of zero
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|e| e.amount.is_settled())
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut MemberBalance> {
        self.entries
            .iter_mut()
            .find(|e| member::same_member(&e.member, name))
    }

    pub(crate) fn credit(&mut self, name: &str, amount: Money) {
        if let Some(entry) = self.entry_mut(name) {
            entry.amount += amount;
        }
    }

    pub(crate) fn debit(&mut self, name: &str, amount: Money) {
        if let Some(entry) = self.entry_mut(name) {
            entry.amount -= amount;
        }
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = &'a MemberBalance;
    type IntoIter = std::slice::Iter<'a, MemberBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Compute balances for `members` from `expenses`
///
/// Each expense is split across the current members (or, when it names
/// participants, across the current members among them). The payer gains the
/// full amount and every member of the split loses one share, so a payer
/// inside the split nets `amount - share`.
///
/// Expenses contribute nothing when the split is empty or when the payer is no
/// longer a member; either would otherwise break the zero-sum invariant.
pub fn compute(members: &[String], expenses: &[Expense]) -> Balances {
    let mut balances = Balances::from_pairs(members.iter().map(|m| (m.as_str(), Money::zero())));

    for expense in expenses {
        let Some(payer) = member::find_member(members, &expense.payer) else {
            tracing::debug!(
                expense_id = %expense.id,
                payer = %expense.payer,
                "skipping expense paid by a former member"
            );
            continue;
        };

        let split = split_members(members, expense);
        if split.is_empty() {
            continue;
        }

        let share = expense.amount.share(split.len());
        balances.credit(payer, expense.amount);
        for name in split {
            balances.debit(name, share);
        }
    }

    balances
}

/// Members an expense is divided across
fn split_members<'a>(members: &'a [String], expense: &Expense) -> Vec<&'a str> {
    match expense.participants.as_deref() {
        Some(participants) if !participants.is_empty() => members
            .iter()
            .filter(|m| participants.iter().any(|p| member::same_member(m, p)))
            .map(String::as_str)
            .collect(),
        _ => members.iter().map(String::as_str).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, GroupId, NewExpense};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn expense(payer: &str, amount: Money) -> Expense {
        Expense::from_new(
            ExpenseId::new(),
            NewExpense::new(GroupId::from_key("g1"), payer, amount, "x", "Food"),
        )
    }

    #[test]
    fn test_three_members_one_expense() {
        let b = compute(
            &members(&["A", "B", "C"]),
            &[expense("A", Money::new(dec!(30)))],
        );
        assert_eq!(b.get("A"), Some(Money::new(dec!(20))));
        assert_eq!(b.get("B"), Some(Money::new(dec!(-10))));
        assert_eq!(b.get("C"), Some(Money::new(dec!(-10))));
    }

    #[test]
    fn test_four_members_one_expense() {
        let b = compute(
            &members(&["A", "B", "C", "D"]),
            &[expense("A", Money::new(dec!(100)))],
        );
        assert_eq!(b.get("A"), Some(Money::new(dec!(75))));
        for m in ["B", "C", "D"] {
            assert_eq!(b.get(m), Some(Money::new(dec!(-25))));
        }
    }

    #[test]
    fn test_no_members_contributes_nothing() {
        let b = compute(&[], &[expense("A", Money::new(dec!(30)))]);
        assert!(b.is_empty());
        assert_eq!(b.total(), Money::zero());
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let b = compute(&members(&["Zoe", "Ana", "Luis"]), &[]);
        let order: Vec<_> = b.iter().map(|e| e.member.as_str()).collect();
        assert_eq!(order, vec!["Zoe", "Ana", "Luis"]);
        assert!(b.is_settled());
    }

    #[test]
    fn test_payer_matched_under_normalization() {
        let b = compute(
            &members(&["Ana", "Luis"]),
            &[expense(" ana", Money::new(dec!(10)))],
        );
        assert_eq!(b.get("Ana"), Some(Money::new(dec!(5))));
        assert_eq!(b.get("Luis"), Some(Money::new(dec!(-5))));
    }

    #[test]
    fn test_former_member_payer_is_skipped() {
        let b = compute(
            &members(&["Ana", "Luis"]),
            &[expense("Marta", Money::new(dec!(40)))],
        );
        assert!(b.is_settled());
        assert_eq!(b.total(), Money::zero());
    }

    #[test]
    fn test_uses_current_membership_for_past_expenses() {
        let past = expense("A", Money::new(dec!(30)));
        let before = compute(&members(&["A", "B", "C"]), std::slice::from_ref(&past));
        let after = compute(&members(&["A", "B"]), &[past]);
        assert_eq!(before.get("A"), Some(Money::new(dec!(20))));
        assert_eq!(after.get("A"), Some(Money::new(dec!(15))));
        assert_eq!(after.get("B"), Some(Money::new(dec!(-15))));
    }

    #[test]
    fn test_participants_restrict_the_split() {
        let mut e = expense("A", Money::new(dec!(30)));
        e.participants = Some(vec!["b".into(), "C".into()]);
        let b = compute(&members(&["A", "B", "C"]), &[e]);
        assert_eq!(b.get("A"), Some(Money::new(dec!(30))));
        assert_eq!(b.get("B"), Some(Money::new(dec!(-15))));
        assert_eq!(b.get("C"), Some(Money::new(dec!(-15))));
    }

    #[test]
    fn test_participants_outside_group_contribute_nothing() {
        let mut e = expense("A", Money::new(dec!(30)));
        e.participants = Some(vec!["Nobody".into()]);
        let b = compute(&members(&["A", "B"]), &[e]);
        assert!(b.is_settled());
    }

    #[test]
    fn test_empty_participants_means_everyone() {
        let mut e = expense("A", Money::new(dec!(30)));
        e.participants = Some(Vec::new());
        let b = compute(&members(&["A", "B", "C"]), &[e]);
        assert_eq!(b.get("A"), Some(Money::new(dec!(20))));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let m = members(&["A", "B", "C"]);
        let e = vec![
            expense("A", Money::new(dec!(10))),
            expense("B", Money::new(dec!(7.77))),
        ];
        assert_eq!(compute(&m, &e), compute(&m, &e));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_balances_sum_to_zero(
            member_count in 1usize..12,
            raw in prop::collection::vec((0usize..12, 0i64..10_000_000i64), 0..60),
        ) {
            let names: Vec<String> = (0..member_count).map(|i| format!("m{i}")).collect();
            let expenses: Vec<Expense> = raw
                .into_iter()
                .map(|(payer, cents)| {
                    expense(&names[payer % member_count], Money::from_cents(cents))
                })
                .collect();

            let balances = compute(&names, &expenses);
            prop_assert!(balances.total().is_settled());
        }
    }
}
