//! Monthly savings needed to cover a fair share before the trip.

use crate::money::Money;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavingsProjection {
    /// Calendar months between `today` and the trip start, at least 1.
    pub months_until_trip: u32,

    pub monthly_saving_needed: Money,
}

impl SavingsProjection {
    /// Projects the savings cadence for `fair_share`.
    ///
    /// Counts calendar months only: the 1st and the 31st of next month are
    /// both one month away. Trips in the past or this month count as 1.
    pub fn project(start_date: NaiveDate, today: NaiveDate, fair_share: Money) -> Self {
        let months = months_between(today, start_date).max(1);
        let months_until_trip = u32::try_from(months).unwrap_or(u32::MAX);

        SavingsProjection {
            months_until_trip,
            monthly_saving_needed: fair_share / months_until_trip,
        }
    }
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}
