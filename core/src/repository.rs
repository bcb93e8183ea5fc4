//! Collaborator seams between the engine and its stores.
//!
//! RULE: Engine components read and write through these traits only.
//! `BurnoutStore` implements all of them over SQLite; tests may swap in
//! in-memory substitutes.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    alerting::{Alert, NewAlert},
    error::EngineResult,
    risk_ledger::{NewRiskScore, RiskScoreRecord},
    roster::StaffMember,
    types::{AlertId, RiskScoreId, StaffId},
    work_history::WorkHourEntry,
};

/// Read-only access to recorded work hours.
pub trait WorkHourSource {
    /// Entries for `staff_id` dated within `[date_from, date_to]`, oldest first.
    fn find_by_staff_and_date_range(
        &self,
        staff_id: StaffId,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> EngineResult<Vec<WorkHourEntry>>;

    /// Up to `limit` entries with regular hours > 0 dated on or before
    /// `max_date`, newest first.
    fn find_recent_by_staff(
        &self,
        staff_id: StaffId,
        max_date: NaiveDate,
        limit: usize,
    ) -> EngineResult<Vec<WorkHourEntry>>;
}

pub trait RiskScoreRepository {
    fn get_risk_score(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> EngineResult<Option<RiskScoreRecord>>;

    /// The record with the latest calculation date for `staff_id`.
    fn latest_risk_score(&self, staff_id: StaffId) -> EngineResult<Option<RiskScoreRecord>>;

    /// Insert or replace the record keyed by (staff, date). Must be atomic per
    /// key and must keep the id of an existing row.
    fn upsert_risk_score(&self, score: &NewRiskScore) -> EngineResult<RiskScoreId>;
}

pub trait AlertRepository {
    fn find_unresolved_by_staff(&self, staff_id: StaffId) -> EngineResult<Option<Alert>>;

    fn insert_alert(&self, alert: &NewAlert) -> EngineResult<AlertId>;

    fn refresh_alert(&self, alert_id: AlertId, risk_score: f64, message: &str)
        -> EngineResult<()>;

    /// Resolve an open alert. Returns the number of rows changed.
    fn mark_resolved(&self, alert_id: AlertId, resolved_at: DateTime<Utc>) -> EngineResult<usize>;
}

pub trait StaffDirectory {
    fn find_staff(&self, staff_id: StaffId) -> EngineResult<Option<StaffMember>>;
}
