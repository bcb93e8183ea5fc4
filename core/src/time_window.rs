//! Calendar windows used by the work-history aggregator.
//!
//! Weeks run Monday to Sunday. Months are calendar months.
//! Both bounds of a window are inclusive dates.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end:   NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The Monday-to-Sunday week containing `date`.
pub fn week_bounds(date: NaiveDate) -> EngineResult<DateWindow> {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let start = date
        .checked_sub_days(Days::new(offset))
        .ok_or(EngineError::DateOutOfRange { date })?;
    let end = start
        .checked_add_days(Days::new(6))
        .ok_or(EngineError::DateOutOfRange { date })?;
    Ok(DateWindow { start, end })
}

/// First through last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> EngineResult<DateWindow> {
    let out_of_range = || EngineError::DateOutOfRange { date };
    let start = date.with_day(1).ok_or_else(out_of_range)?;
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(out_of_range)?;
    Ok(DateWindow { start, end })
}

/// The Sunday that identifies the weekend `date` falls in.
/// Saturday maps forward one day; weekdays have no weekend key.
pub fn weekend_key(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.succ_opt(),
        Weekday::Sun => Some(date),
        _ => None,
    }
}
