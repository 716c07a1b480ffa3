//! Contribution and balance calculation.
//!
//! Maintains the invariant: the sum of all balances is zero, since
//! `fair_share * n == total` and every reimbursement debits and credits the
//! pool by the same amount.

use crate::money::Money;
use crate::trip::{ExpenseItem, Reimbursement};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One family's position relative to an equal split.
///
/// Positive `balance` means the family is owed money (creditor), negative
/// means it owes money (debtor).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantBalance {
    pub family: String,

    /// Items paid plus reimbursements made minus reimbursements received.
    pub contribution: Money,

    /// `contribution - fair_share`.
    pub balance: Money,
}

/// Per-category spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub paid: Money,
}

/// Output of [`compute_balances`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSheet {
    /// Cost of every item, paid or not.
    pub total: Money,

    /// Cost of paid items only.
    pub paid: Money,

    /// `total / max(1, participants)`.
    pub fair_share: Money,

    /// One entry per participant, in participant-list order.
    pub balances: Vec<ParticipantBalance>,
}

impl BalanceSheet {
    /// Sum of every balance.
    pub fn net(&self) -> Money {
        self.balances.iter().map(|b| b.balance).sum()
    }

    pub fn get(&self, family: &str) -> Option<&ParticipantBalance> {
        self.balances.iter().find(|b| b.family == family)
    }
}

/// Computes contributions and balances against an equal-split baseline.
///
/// References to families not in `participants` are skipped. Duplicate names
/// keep their first position. Sums beyond the decimal range saturate.
pub fn compute_balances(
    participants: &[String],
    categories: &BTreeMap<String, Vec<ExpenseItem>>,
    reimbursements: &[Reimbursement],
) -> BalanceSheet {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(participants.len());
    let mut balances: Vec<ParticipantBalance> = Vec::with_capacity(participants.len());

    for family in participants {
        if index.contains_key(family.as_str()) {
            debug!("Ignoring duplicate participant {}", family);
            continue;
        }
        index.insert(family.as_str(), balances.len());
        balances.push(ParticipantBalance {
            family: family.clone(),
            contribution: Money::ZERO,
            balance: Money::ZERO,
        });
    }

    let mut total = Money::ZERO;
    let mut paid = Money::ZERO;

    for item in categories.values().flatten() {
        total = total.checked_add(item.cost).unwrap_or_else(|| {
            warn!(
                "Trip total overflows at item '{}', saturating",
                item.description
            );
            total + item.cost
        });
        if !item.paid {
            continue;
        }
        paid += item.cost;

        match item.payer.as_deref().and_then(|p| index.get(p)) {
            Some(&slot) => balances[slot].contribution += item.cost,
            None => debug!(
                "Item '{}' paid by unknown family {:?}, not credited",
                item.description, item.payer
            ),
        }
    }

    for r in reimbursements {
        match index.get(r.debtor.as_str()) {
            Some(&slot) => balances[slot].contribution += r.amount,
            None => debug!("Reimbursement debtor {} not a participant, skipping", r.debtor),
        }
        match index.get(r.creditor.as_str()) {
            Some(&slot) => balances[slot].contribution -= r.amount,
            None => debug!(
                "Reimbursement creditor {} not a participant, skipping",
                r.creditor
            ),
        }
    }

    let fair_share = total.split(balances.len());
    for entry in &mut balances {
        entry.balance = entry.contribution - fair_share;
    }

    BalanceSheet {
        total,
        paid,
        fair_share,
        balances,
    }
}

/// Totals per category, in category-name order.
pub fn category_totals(categories: &BTreeMap<String, Vec<ExpenseItem>>) -> Vec<CategoryTotal> {
    categories
        .iter()
        .map(|(category, items)| CategoryTotal {
            category: category.clone(),
            total: items.iter().map(|i| i.cost).sum(),
            paid: items.iter().filter(|i| i.paid).map(|i| i.cost).sum(),
        })
        .collect()
}
