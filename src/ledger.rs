//! Trip ledger CSV parsing.
//!
//! One ledger file describes a whole trip. Each row is a `trip`, `family`,
//! `expense` or `reimbursement` record; malformed rows are logged and skipped.

use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::trip::{ExpenseItem, Reimbursement, TripSnapshot};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Raw ledger row as read from CSV.
///
/// Every column except `kind` is optional; which ones matter depends on the
/// row kind.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerRecord {
    pub kind: String,
    pub family: Option<String>,
    pub counterparty: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub paid: Option<String>,
    pub date: Option<String>,
}

/// A typed ledger row.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    /// Trip name and start date.
    Trip { name: String, start_date: NaiveDate },

    Family(String),

    Expense { category: String, item: ExpenseItem },

    Reimbursement(Reimbursement),
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl LedgerRecord {
    /// Parses the raw record into a typed entry.
    ///
    /// Returns `None` if the record is unusable (unknown kind, missing name,
    /// bad date, non-positive reimbursement).
    pub fn parse(&self) -> Option<LedgerEntry> {
        let kind = self.kind.trim().to_lowercase();

        match kind.as_str() {
            "trip" => {
                let start_date = parse_date(non_empty(&self.date)?)?;
                let name = non_empty(&self.description).unwrap_or("").to_string();
                Some(LedgerEntry::Trip { name, start_date })
            }
            "family" => non_empty(&self.family).map(|f| LedgerEntry::Family(f.to_string())),
            "expense" => {
                let payer = non_empty(&self.family).map(str::to_string);
                let paid = match non_empty(&self.paid) {
                    Some(flag) => parse_flag(flag)?,
                    None => payer.is_some(),
                };
                let cost = match non_empty(&self.amount) {
                    Some(raw) => Money::from_str(raw).unwrap_or_else(|_| {
                        warn!("Non-numeric expense amount '{}', counting as zero", raw);
                        Money::ZERO
                    }),
                    None => Money::ZERO,
                };
                let cost = if cost < Money::ZERO {
                    warn!("Negative expense amount {}, counting as zero", cost);
                    Money::ZERO
                } else {
                    cost
                };
                Some(LedgerEntry::Expense {
                    category: non_empty(&self.category).unwrap_or("general").to_string(),
                    item: ExpenseItem {
                        description: non_empty(&self.description).unwrap_or("").to_string(),
                        cost,
                        paid,
                        payer,
                    },
                })
            }
            "reimbursement" => {
                let debtor = non_empty(&self.family)?.to_string();
                let creditor = non_empty(&self.counterparty)?.to_string();
                let amount = Money::from_str(non_empty(&self.amount)?).ok()?;
                if amount <= Money::ZERO {
                    return None;
                }
                let timestamp = parse_timestamp(non_empty(&self.date)?)?;
                Some(LedgerEntry::Reimbursement(Reimbursement {
                    debtor,
                    creditor,
                    amount,
                    timestamp,
                }))
            }
            _ => None,
        }
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parses a timestamp; a bare date means midnight.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Reads a ledger into a trip snapshot.
///
/// The ledger must contain a `trip` row with a valid date; a later one wins.
pub fn read_ledger<R: Read>(reader: R) -> Result<TripSnapshot> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut trip: Option<(String, NaiveDate)> = None;
    let mut snapshot = TripSnapshot::new("", NaiveDate::MIN);

    for (row_idx, result) in csv_reader.deserialize::<LedgerRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
                continue;
            }
        };

        match record.parse() {
            Some(LedgerEntry::Trip { name, start_date }) => {
                debug!("Row {}: Trip '{}' starts {}", row_num, name, start_date);
                trip = Some((name, start_date));
            }
            Some(LedgerEntry::Family(family)) => {
                if !snapshot.add_participant(family.as_str()) {
                    warn!("Row {}: Duplicate family {}, ignoring", row_num, family);
                }
            }
            Some(LedgerEntry::Expense { category, item }) => {
                debug!(
                    "Row {}: Expense '{}' of {} in {}",
                    row_num, item.description, item.cost, category
                );
                snapshot.add_item(category, item);
            }
            Some(LedgerEntry::Reimbursement(r)) => {
                debug!(
                    "Row {}: {} reimbursed {} to {}",
                    row_num, r.debtor, r.amount, r.creditor
                );
                snapshot.add_reimbursement(r);
            }
            None => warn!(
                "Row {}: Failed to parse '{}' ledger record",
                row_num, record.kind
            ),
        }
    }

    let (name, start_date) = trip.ok_or(EngineError::MissingTripDate)?;
    snapshot.name = name;
    snapshot.start_date = start_date;
    Ok(snapshot)
}
