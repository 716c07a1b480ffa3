//! Settlement engine facade and CSV report output.
//!
//! Runs the balance, settlement and savings calculations over one trip
//! snapshot. Every run is recomputed from scratch; nothing is cached between
//! calls and the snapshot is never modified.

use crate::balance::{category_totals, compute_balances, CategoryTotal, ParticipantBalance};
use crate::error::{EngineError, Result};
use crate::money::Money;
use crate::savings::SavingsProjection;
use crate::settlement::{suggest_settlements, Settlement};
use crate::trip::TripSnapshot;
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Everything derived from one trip snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripReport {
    pub trip: String,
    pub total: Money,
    pub paid: Money,
    pub fair_share: Money,

    /// Participant order.
    pub balances: Vec<ParticipantBalance>,

    /// Suggested payments, in the order they should be applied.
    pub settlements: Vec<Settlement>,

    pub categories: Vec<CategoryTotal>,

    pub months_until_trip: u32,
    pub monthly_saving_needed: Money,
}

/// Stateless settlement engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SettlementEngine;

impl SettlementEngine {
    pub fn new() -> Self {
        SettlementEngine
    }

    /// Computes the full report for `trip` as of `today`.
    ///
    /// Never fails: stale family references are skipped and an empty
    /// participant list splits the total by one.
    pub fn run(&self, trip: &TripSnapshot, today: NaiveDate) -> TripReport {
        let sheet = compute_balances(&trip.participants, &trip.categories, &trip.reimbursements);
        let settlements = suggest_settlements(&sheet.balances);
        let savings = SavingsProjection::project(trip.start_date, today, sheet.fair_share);

        debug!(
            "Trip '{}': total {}, fair share {}, {} suggestion(s)",
            trip.name,
            sheet.total,
            sheet.fair_share,
            settlements.len()
        );

        TripReport {
            trip: trip.name.clone(),
            total: sheet.total,
            paid: sheet.paid,
            fair_share: sheet.fair_share,
            balances: sheet.balances,
            settlements,
            categories: category_totals(&trip.categories),
            months_until_trip: savings.months_until_trip,
            monthly_saving_needed: savings.monthly_saving_needed,
        }
    }
}

/// Which table of a [`TripReport`] to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    Balances,
    #[default]
    Settlements,
    Categories,
    Summary,
}

impl FromStr for ReportKind {
    type Err = EngineError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balances" => Ok(ReportKind::Balances),
            "settlements" => Ok(ReportKind::Settlements),
            "categories" => Ok(ReportKind::Categories),
            "summary" => Ok(ReportKind::Summary),
            _ => Err(EngineError::UnknownReport(s.to_string())),
        }
    }
}

impl TripReport {
    /// Writes one table as CSV.
    ///
    /// All monetary values are formatted with exactly 2 decimal places.
    pub fn write_csv<W: Write>(&self, kind: ReportKind, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        match kind {
            ReportKind::Balances => {
                csv_writer.write_record(["family", "contribution", "balance"])?;
                for b in &self.balances {
                    csv_writer.write_record([
                        b.family.clone(),
                        b.contribution.to_string(),
                        b.balance.to_string(),
                    ])?;
                }
            }
            ReportKind::Settlements => {
                csv_writer.write_record(["debtor", "creditor", "amount"])?;
                for s in &self.settlements {
                    csv_writer.write_record([
                        s.debtor.clone(),
                        s.creditor.clone(),
                        s.amount.to_string(),
                    ])?;
                }
            }
            ReportKind::Categories => {
                csv_writer.write_record(["category", "total", "paid"])?;
                for c in &self.categories {
                    csv_writer.write_record([
                        c.category.clone(),
                        c.total.to_string(),
                        c.paid.to_string(),
                    ])?;
                }
            }
            ReportKind::Summary => {
                csv_writer.write_record([
                    "trip",
                    "total",
                    "paid",
                    "fair_share",
                    "months_until_trip",
                    "monthly_saving_needed",
                ])?;
                csv_writer.write_record([
                    self.trip.clone(),
                    self.total.to_string(),
                    self.paid.to_string(),
                    self.fair_share.to_string(),
                    self.months_until_trip.to_string(),
                    self.monthly_saving_needed.to_string(),
                ])?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::ExpenseItem;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn three_family_trip() -> TripSnapshot {
        let mut trip = TripSnapshot::new("Sierra", NaiveDate::from_ymd_opt(2027, 1, 5).unwrap());
        for family in ["A", "B", "C"] {
            trip.add_participant(family);
        }
        trip.add_item("lodging", ExpenseItem::paid_by("cabin", Money::from_units(60), "A"));
        trip.add_item("food", ExpenseItem::paid_by("groceries", Money::from_units(30), "B"));
        trip
    }

    fn render(report: &TripReport, kind: ReportKind) -> String {
        let mut out = Vec::new();
        report.write_csv(kind, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_run_three_families() {
        let report = SettlementEngine::new().run(&three_family_trip(), today());

        assert_eq!(report.total, Money::from_units(90));
        assert_eq!(report.fair_share, Money::from_units(30));
        assert_eq!(report.settlements.len(), 1);
        assert_eq!(report.settlements[0].debtor, "C");
        assert_eq!(report.settlements[0].creditor, "A");
        assert_eq!(report.settlements[0].amount, Money::from_units(30));
        assert_eq!(report.months_until_trip, 3);
        assert_eq!(report.monthly_saving_needed, Money::from_units(10));
    }

    #[test]
    fn test_run_does_not_modify_snapshot() {
        let trip = three_family_trip();
        let before = trip.clone();
        let _ = SettlementEngine::new().run(&trip, today());
        assert_eq!(trip, before);
    }

    #[test]
    fn test_report_kind_from_str() {
        assert_eq!("Balances".parse::<ReportKind>().unwrap(), ReportKind::Balances);
        assert_eq!(" summary ".parse::<ReportKind>().unwrap(), ReportKind::Summary);
        assert!(matches!(
            "pins".parse::<ReportKind>(),
            Err(EngineError::UnknownReport(_))
        ));
        assert_eq!(ReportKind::default(), ReportKind::Settlements);
    }

    #[test]
    fn test_write_balances() {
        let report = SettlementEngine::new().run(&three_family_trip(), today());
        let out = render(&report, ReportKind::Balances);
        assert_eq!(
            out,
            "family,contribution,balance\nA,60.00,30.00\nB,30.00,0.00\nC,0.00,-30.00\n"
        );
    }

    #[test]
    fn test_write_settlements_and_summary() {
        let report = SettlementEngine::new().run(&three_family_trip(), today());

        assert_eq!(
            render(&report, ReportKind::Settlements),
            "debtor,creditor,amount\nC,A,30.00\n"
        );
        assert_eq!(
            render(&report, ReportKind::Summary),
            "trip,total,paid,fair_share,months_until_trip,monthly_saving_needed\n\
             Sierra,90.00,90.00,30.00,3,10.00\n"
        );
    }

    #[test]
    fn test_write_categories() {
        let report = SettlementEngine::new().run(&three_family_trip(), today());
        assert_eq!(
            render(&report, ReportKind::Categories),
            "category,total,paid\nfood,30.00,30.00\nlodging,60.00,60.00\n"
        );
    }
}
