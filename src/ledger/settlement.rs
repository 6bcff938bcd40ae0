//! Settlement Planner
//!
//! Turns balances into a list of transfers that bring every member back to
//! zero. The planner is greedy: it repeatedly matches the largest remaining
//! debtor with the largest remaining creditor. This keeps the number of
//! transfers at most `debtors + creditors - 1`, but it is a heuristic and does
//! not always find the smallest possible number of transfers (that problem is
//! NP-hard in general).

use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::models::Money;

use super::balance::Balances;

/// A directed settlement instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Member who pays
    pub from: String,
    /// Member who receives
    pub to: String,
    /// Positive amount to pay
    pub amount: Money,
}

/// One side of the matching with its outstanding amount
#[derive(Debug)]
struct Party {
    member: String,
    outstanding: Money,
}

/// Largest outstanding amount first, then member name ascending
fn by_outstanding_desc(a: &Party, b: &Party) -> Ordering {
    b.outstanding
        .cmp(&a.outstanding)
        .then_with(|| a.member.cmp(&b.member))
}

/// Round balances to whole cents without changing their sum
///
/// Every amount is floored to the cent, then the cents lost to flooring are
/// handed back one at a time to the largest remainders (ties by name). Each
/// rounded amount stays strictly within one cent of the exact balance.
fn whole_cents(balances: &Balances) -> Vec<(String, Money)> {
    let mut rows: Vec<(String, Decimal, Decimal)> = balances
        .iter()
        .map(|e| {
            let scaled = e.amount.amount() * Decimal::ONE_HUNDRED;
            let floor = scaled.floor();
            (e.member.clone(), floor, scaled - floor)
        })
        .collect();

    let target = (balances.total().amount() * Decimal::ONE_HUNDRED).round();
    let floored: Decimal = rows.iter().map(|r| r.1).sum();
    let mut missing = target - floored;

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| rows[b].2.cmp(&rows[a].2).then_with(|| rows[a].0.cmp(&rows[b].0)));
    for i in order {
        if missing <= Decimal::ZERO {
            break;
        }
        rows[i].1 += Decimal::ONE;
        missing -= Decimal::ONE;
    }

    rows
        .into_iter()
        .map(|(member, cents, _)| (member, Money::new(cents / Decimal::ONE_HUNDRED)))
        .collect()
}

/// Plan transfers that settle `balances`
///
/// Planning works on balances rounded to whole cents, so every transfer is a
/// payable amount and every member ends strictly within one cent of zero.
/// Members who round to zero take no part. Ties between equal amounts are
/// resolved by member name so the output is reproducible.
pub fn plan(balances: &Balances) -> Vec<Transfer> {
    let mut debtors: Vec<Party> = Vec::new();
    let mut creditors: Vec<Party> = Vec::new();

    for (member, amount) in whole_cents(balances) {
        if amount.is_settled() {
            continue;
        }
        if amount.is_negative() {
            debtors.push(Party {
                member,
                outstanding: -amount,
            });
        } else {
            creditors.push(Party {
                member,
                outstanding: amount,
            });
        }
    }

    let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));

    while !debtors.is_empty() && !creditors.is_empty() {
        debtors.sort_by(by_outstanding_desc);
        creditors.sort_by(by_outstanding_desc);

        let amount = debtors[0].outstanding.min(creditors[0].outstanding);
        transfers.push(Transfer {
            from: debtors[0].member.clone(),
            to: creditors[0].member.clone(),
            amount,
        });

        debtors[0].outstanding -= amount;
        creditors[0].outstanding -= amount;

        if debtors[0].outstanding.is_settled() {
            debtors.remove(0);
        }
        if creditors[0].outstanding.is_settled() {
            creditors.remove(0);
        }
    }

    transfers
}

/// Replay transfers against balances: debtors pay, creditors receive
pub fn apply(balances: &Balances, transfers: &[Transfer]) -> Balances {
    let mut result = balances.clone();
    for transfer in transfers {
        result.credit(&transfer.from, transfer.amount);
        result.debit(&transfer.to, transfer.amount);
    }
    result
}
