//! Trip snapshot models consumed by the settlement engine.

use crate::money::Money;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single shared expense.
///
/// An unpaid item counts toward the trip total but toward no participant's
/// contribution. A paid item with no payer behaves the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub description: String,

    /// Non-negative cost.
    pub cost: Money,

    pub paid: bool,

    /// Family that paid the item, if any.
    pub payer: Option<String>,
}

impl ExpenseItem {
    /// Creates an item already paid by `payer`.
    pub fn paid_by(description: impl Into<String>, cost: Money, payer: impl Into<String>) -> Self {
        ExpenseItem {
            description: description.into(),
            cost,
            paid: true,
            payer: Some(payer.into()),
        }
    }

    /// Creates an item nobody has paid yet.
    pub fn unpaid(description: impl Into<String>, cost: Money) -> Self {
        ExpenseItem {
            description: description.into(),
            cost,
            paid: false,
            payer: None,
        }
    }
}

/// Money that already changed hands from `debtor` to `creditor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reimbursement {
    pub debtor: String,
    pub creditor: String,

    /// Positive amount paid.
    pub amount: Money,

    pub timestamp: NaiveDateTime,
}

/// Immutable view of one trip's expense data.
///
/// # Ordering
///
/// `participants` order is significant: balances come out in this order and
/// settlement ties are broken by it. Categories iterate in name order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSnapshot {
    pub name: String,
    pub start_date: NaiveDate,
    pub participants: Vec<String>,
    pub categories: BTreeMap<String, Vec<ExpenseItem>>,
    pub reimbursements: Vec<Reimbursement>,
}

impl TripSnapshot {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        TripSnapshot {
            name: name.into(),
            start_date,
            participants: Vec::new(),
            categories: BTreeMap::new(),
            reimbursements: Vec::new(),
        }
    }

    /// Appends a participant unless the name is already listed.
    ///
    /// Returns `false` for duplicates.
    pub fn add_participant(&mut self, family: impl Into<String>) -> bool {
        let family = family.into();
        if self.participants.contains(&family) {
            return false;
        }
        self.participants.push(family);
        true
    }

    pub fn add_item(&mut self, category: impl Into<String>, item: ExpenseItem) {
        self.categories.entry(category.into()).or_default().push(item);
    }

    pub fn add_reimbursement(&mut self, reimbursement: Reimbursement) {
        self.reimbursements.push(reimbursement);
    }

    /// All items across categories, in category-name order.
    pub fn items(&self) -> impl Iterator<Item = &ExpenseItem> {
        self.categories.values().flatten()
    }
}
