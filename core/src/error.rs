use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{AlertId, EntryId, StaffId};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Risk calculation failed for staff {staff_id}: {reason}")]
    RiskCalculation { staff_id: StaffId, reason: String },

    #[error("Alert {alert_id} not found or already resolved")]
    AlertNotFound { alert_id: AlertId },

    #[error("Notification delivery failed: {reason}")]
    NotificationDelivery { reason: String },

    #[error("Staff member {staff_id} not found")]
    StaffNotFound { staff_id: StaffId },

    #[error("Work hours entry {entry_id} not found")]
    WorkHoursNotFound { entry_id: EntryId },

    #[error("Work hours already recorded for staff {staff_id} on {date}")]
    DuplicateWorkHours { staff_id: StaffId, date: NaiveDate },

    #[error("Invalid work hours: {reason}")]
    InvalidWorkHours { reason: String },

    #[error("Date window out of range around {date}")]
    DateOutOfRange { date: NaiveDate },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
