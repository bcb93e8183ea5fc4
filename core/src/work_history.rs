//! Work-history aggregation: the four raw inputs to the risk score.
//!
//! Every read here is side-effect-free. A failed read never fails the
//! score: it is logged and the factor falls back to zero.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::EngineResult,
    repository::WorkHourSource,
    time_window::{month_bounds, week_bounds, weekend_key},
    types::{EntryId, StaffId},
};

/// Default number of recent worked entries scanned for a streak.
pub const DEFAULT_STREAK_SCAN_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHourEntry {
    pub entry_id:       EntryId,
    pub staff_id:       StaffId,
    pub work_date:      NaiveDate,
    pub hours_worked:   f64,
    pub overtime_hours: f64,
}

impl WorkHourEntry {
    pub fn total_hours(&self) -> f64 {
        self.hours_worked + self.overtime_hours
    }

    pub fn is_worked(&self) -> bool {
        self.hours_worked > 0.0
    }
}

/// Raw factor values for one (staff, date).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistorySummary {
    pub consecutive_days: u32,
    pub weekly_overtime:  f64,
    pub weekly_hours:     f64,
    pub weekend_days:     u32,
}

pub struct WorkHistoryAggregator<'a> {
    source:     &'a dyn WorkHourSource,
    scan_limit: usize,
}

impl<'a> WorkHistoryAggregator<'a> {
    pub fn new(source: &'a dyn WorkHourSource, scan_limit: usize) -> Self {
        Self { source, scan_limit }
    }

    pub fn summarize(&self, staff_id: StaffId, target_date: NaiveDate) -> HistorySummary {
        HistorySummary {
            consecutive_days: self.consecutive_work_days(staff_id, target_date),
            weekly_overtime:  self.weekly_overtime_hours(staff_id, target_date),
            weekly_hours:     self.weekly_total_hours(staff_id, target_date),
            weekend_days:     self.monthly_weekend_work(staff_id, target_date),
        }
    }

    /// Length of the daily streak ending on `target_date`.
    /// Zero when `target_date` itself has no worked entry.
    pub fn consecutive_work_days(&self, staff_id: StaffId, target_date: NaiveDate) -> u32 {
        self.or_zero(staff_id, "consecutive work days", || {
            let mut entries = self
                .source
                .find_recent_by_staff(staff_id, target_date, self.scan_limit)?;
            entries.sort_by(|a, b| b.work_date.cmp(&a.work_date));

            let mut expected = target_date;
            let mut streak = 0u32;
            for entry in entries.iter().filter(|e| e.is_worked()) {
                if entry.work_date != expected {
                    break;
                }
                streak += 1;
                match expected.pred_opt() {
                    Some(previous) => expected = previous,
                    None => break,
                }
            }
            Ok(streak)
        })
    }

    pub fn weekly_overtime_hours(&self, staff_id: StaffId, target_date: NaiveDate) -> f64 {
        self.or_zero(staff_id, "weekly overtime", || {
            let week = week_bounds(target_date)?;
            let entries =
                self.source
                    .find_by_staff_and_date_range(staff_id, week.start, week.end)?;
            Ok(entries.iter().map(|e| e.overtime_hours).sum())
        })
    }

    pub fn weekly_total_hours(&self, staff_id: StaffId, target_date: NaiveDate) -> f64 {
        self.or_zero(staff_id, "weekly hours", || {
            let week = week_bounds(target_date)?;
            let entries =
                self.source
                    .find_by_staff_and_date_range(staff_id, week.start, week.end)?;
            Ok(entries.iter().map(WorkHourEntry::total_hours).sum())
        })
    }

    /// Distinct weekends this month with a worked Saturday or Sunday.
    pub fn monthly_weekend_work(&self, staff_id: StaffId, target_date: NaiveDate) -> u32 {
        self.or_zero(staff_id, "weekend work", || {
            let month = month_bounds(target_date)?;
            let entries =
                self.source
                    .find_by_staff_and_date_range(staff_id, month.start, month.end)?;
            let weekends: BTreeSet<NaiveDate> = entries
                .iter()
                .filter(|e| e.is_worked())
                .filter_map(|e| weekend_key(e.work_date))
                .collect();
            Ok(weekends.len() as u32)
        })
    }

    fn or_zero<T: Default>(
        &self,
        staff_id: StaffId,
        factor: &str,
        read: impl FnOnce() -> EngineResult<T>,
    ) -> T {
        match read() {
            Ok(value) => value,
            Err(e) => {
                log::warn!("staff={staff_id} history: {factor} unavailable, using zero: {e}");
                T::default()
            }
        }
    }
}
