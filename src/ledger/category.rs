//! Category Aggregator
//!
//! Totals expense amounts per category label. Output order is the order in
//! which each category first appears in the input, so callers that render
//! the list get a stable layout.

use crate::models::{Expense, Money};

/// Total spent in one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

/// Sum expense amounts per category, skipping uncategorized expenses
pub fn aggregate(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        let Some(category) = expense.category() else {
            continue;
        };

        match totals.iter_mut().find(|t| t.category == category) {
            Some(entry) => entry.total += expense.amount,
            None => totals.push(CategoryTotal {
                category: category.to_string(),
                total: expense.amount,
            }),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, GroupId, NewExpense};

    fn expense(category: &str, cents: i64) -> Expense {
        Expense::from_new(
            ExpenseId::new(),
            NewExpense::new(
                GroupId::from_key("g"),
                "Ana",
                Money::from_cents(cents),
                "x",
                category,
            ),
        )
    }

    #[test]
    fn test_first_seen_order() {
        let totals = aggregate(&[
            expense("Food", 1000),
            expense("Food", 500),
            expense("Fuel", 2000),
        ]);
        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Food".into(),
                    total: Money::from_cents(1500),
                },
                CategoryTotal {
                    category: "Fuel".into(),
                    total: Money::from_cents(2000),
                },
            ]
        );
    }

    #[test]
    fn test_order_follows_input_not_alphabet() {
        let totals = aggregate(&[expense("Lodging", 100), expense("Food", 100)]);
        let names: Vec<_> = totals.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(names, vec!["Lodging", "Food"]);
    }

    #[test]
    fn test_skips_uncategorized() {
        let totals = aggregate(&[expense("", 100), expense("  ", 200), expense("Food", 300)]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, Money::from_cents(300));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }
}
