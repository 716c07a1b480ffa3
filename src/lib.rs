//! # Trip Settlement
//!
//! Group-expense settlement for a shared trip: who paid what, who owes whom,
//! and how much each family should save per month before departure.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: `rust_decimal` money, displayed at 2 decimal places
//! - **Cent tolerance**: balances within 0.01 of zero count as settled
//! - **Zero-sum invariant**: fully paid trips leave balances summing to zero
//! - **Deterministic output**: participant order drives balance order and
//!   settlement tie-breaks
//! - **Total computation**: the engine never fails on any snapshot
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use trip_settlement::{ExpenseItem, Money, SettlementEngine, TripSnapshot};
//!
//! let mut trip = TripSnapshot::new("Coast", NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
//! trip.add_participant("A");
//! trip.add_participant("B");
//! trip.add_item("lodging", ExpenseItem::paid_by("cabin", Money::from_units(100), "A"));
//!
//! let report = SettlementEngine::new().run(&trip, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
//! assert_eq!(report.settlements[0].debtor, "B");
//! assert_eq!(report.settlements[0].amount, Money::from_units(50));
//! ```

pub mod balance;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod savings;
pub mod settlement;
pub mod trip;

pub use balance::{
    category_totals, compute_balances, BalanceSheet, CategoryTotal, ParticipantBalance,
};
pub use engine::{ReportKind, SettlementEngine, TripReport};
pub use error::{EngineError, Result};
pub use ledger::{read_ledger, LedgerEntry, LedgerRecord};
pub use money::Money;
pub use savings::SavingsProjection;
pub use settlement::{suggest_settlements, Settlement};
pub use trip::{ExpenseItem, Reimbursement, TripSnapshot};
