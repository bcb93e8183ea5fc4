//! Shared primitive types used across the engine.

/// Row id of a staff member.
pub type StaffId = i64;

/// Row id of a work-hours entry.
pub type EntryId = i64;

/// Row id of a persisted risk score.
pub type RiskScoreId = i64;

/// Row id of an alert.
pub type AlertId = i64;
