//! Greedy settlement suggestions.
//!
//! Matches the largest debtor against the largest creditor until either side
//! runs out. This is deterministic but not minimal in transfer count.

use crate::balance::ParticipantBalance;
use crate::money::Money;
use crate::trip::Reimbursement;
use chrono::NaiveDateTime;
use log::debug;
use serde::Serialize;

/// A proposed payment from `debtor` to `creditor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub debtor: String,
    pub creditor: String,
    pub amount: Money,
}

impl Settlement {
    /// Records this suggestion as a confirmed reimbursement.
    pub fn into_reimbursement(self, timestamp: NaiveDateTime) -> Reimbursement {
        Reimbursement {
            debtor: self.debtor,
            creditor: self.creditor,
            amount: self.amount,
            timestamp,
        }
    }
}

/// Suggests payments that bring every balance within tolerance of zero.
///
/// Debtors are taken most-negative first and creditors most-positive first.
/// Ties keep the order of `balances`.
pub fn suggest_settlements(balances: &[ParticipantBalance]) -> Vec<Settlement> {
    let mut debtors: Vec<(&str, Money)> = balances
        .iter()
        .filter(|b| b.balance < -Money::TOLERANCE)
        .map(|b| (b.family.as_str(), b.balance))
        .collect();
    let mut creditors: Vec<(&str, Money)> = balances
        .iter()
        .filter(|b| b.balance > Money::TOLERANCE)
        .map(|b| (b.family.as_str(), b.balance))
        .collect();

    // Vec::sort_by is stable, so equal balances stay in participant order
    debtors.sort_by(|a, b| a.1.cmp(&b.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut settlements = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let (debtor, owed) = debtors[d];
        let (creditor, due) = creditors[c];
        let amount = owed.abs().min(due);

        if amount > Money::TOLERANCE {
            debug!("Suggesting {} pays {} to {}", debtor, amount, creditor);
            settlements.push(Settlement {
                debtor: debtor.to_string(),
                creditor: creditor.to_string(),
                amount,
            });
        }

        debtors[d].1 += amount;
        creditors[c].1 -= amount;

        let debtor_done = debtors[d].1.is_settled();
        let creditor_done = creditors[c].1.is_settled();
        if debtor_done {
            d += 1;
        }
        if creditor_done {
            c += 1;
        }
        if !debtor_done && !creditor_done {
            // min() zeroes at least one side; only reachable on a sub-cent amount
            d += 1;
        }
    }

    settlements
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn balance(family: &str, amount: &str) -> ParticipantBalance {
        ParticipantBalance {
            family: family.to_string(),
            contribution: Money::ZERO,
            balance: Money::from_str(amount).unwrap(),
        }
    }

    fn triples(settlements: &[Settlement]) -> Vec<(&str, &str, String)> {
        settlements
            .iter()
            .map(|s| (s.debtor.as_str(), s.creditor.as_str(), s.amount.to_string()))
            .collect()
    }

    #[test]
    fn test_single_pair() {
        let out = suggest_settlements(&[balance("A", "50"), balance("B", "-50")]);
        assert_eq!(triples(&out), vec![("B", "A", "50.00".to_string())]);
    }

    #[test]
    fn test_settled_participants_are_ignored() {
        let out = suggest_settlements(&[
            balance("A", "30"),
            balance("B", "0.005"),
            balance("C", "-30.005"),
        ]);
        assert_eq!(triples(&out), vec![("C", "A", "30.00".to_string())]);
    }

    #[test]
    fn test_largest_first_matching() {
        let out = suggest_settlements(&[
            balance("A", "-10"),
            balance("B", "70"),
            balance("C", "-60"),
            balance("D", "0"),
        ]);
        assert_eq!(
            triples(&out),
            vec![
                ("C", "B", "60.00".to_string()),
                ("A", "B", "10.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_one_debtor_many_creditors() {
        let out = suggest_settlements(&[
            balance("A", "20"),
            balance("B", "-90"),
            balance("C", "40"),
            balance("D", "30"),
        ]);
        assert_eq!(
            triples(&out),
            vec![
                ("B", "C", "40.00".to_string()),
                ("B", "D", "30.00".to_string()),
                ("B", "A", "20.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_ties_follow_participant_order() {
        let out = suggest_settlements(&[
            balance("Z", "-25"),
            balance("Y", "25"),
            balance("X", "-25"),
            balance("W", "25"),
        ]);
        assert_eq!(
            triples(&out),
            vec![
                ("Z", "Y", "25.00".to_string()),
                ("X", "W", "25.00".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_creditors_yields_nothing() {
        assert!(suggest_settlements(&[balance("A", "-5"), balance("B", "-5")]).is_empty());
        assert!(suggest_settlements(&[]).is_empty());
    }

    #[test]
    fn test_into_reimbursement() {
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 10, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let r = Settlement {
            debtor: "B".to_string(),
            creditor: "A".to_string(),
            amount: Money::from_units(50),
        }
        .into_reimbursement(ts);

        assert_eq!(r.debtor, "B");
        assert_eq!(r.creditor, "A");
        assert_eq!(r.amount, Money::from_units(50));
        assert_eq!(r.timestamp, ts);
    }
}
