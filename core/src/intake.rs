//! Work-hours intake and the recalculation trigger.
//!
//! Every create, update or delete of a work-hours entry is followed by a
//! risk recalculation for the affected date, then an alert decision when
//! the new score is high. The write itself never fails because of the
//! recalculation; a failed recalculation shows up as `None`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    alerting::{AlertEngine, AlertOutcome},
    error::{EngineError, EngineResult},
    risk_ledger::{RiskLedger, RiskScoreRecord},
    store::BurnoutStore,
    types::{EntryId, StaffId},
    work_history::WorkHourEntry,
};

pub const MAX_DAILY_HOURS: f64 = 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkHours {
    pub staff_id:       StaffId,
    pub work_date:      NaiveDate,
    pub hours_worked:   f64,
    #[serde(default)]
    pub overtime_hours: f64,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkHoursPatch {
    pub hours_worked:   Option<f64>,
    pub overtime_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeOutcome {
    pub entry:        WorkHourEntry,
    pub updated_risk: Option<RiskScoreRecord>,
    pub alert:        Option<AlertOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemovalOutcome {
    pub removed:      WorkHourEntry,
    pub updated_risk: Option<RiskScoreRecord>,
    pub alert:        Option<AlertOutcome>,
}

pub fn validate_hours(hours_worked: f64, overtime_hours: f64) -> EngineResult<()> {
    if !(0.0..=MAX_DAILY_HOURS).contains(&hours_worked) {
        return Err(EngineError::InvalidWorkHours {
            reason: format!("hours worked must be between 0 and 24, got {hours_worked}"),
        });
    }
    if !overtime_hours.is_finite() || overtime_hours < 0.0 {
        return Err(EngineError::InvalidWorkHours {
            reason: format!("overtime hours must be 0 or greater, got {overtime_hours}"),
        });
    }
    Ok(())
}

pub struct WorkHourIntake<'a> {
    store:  &'a BurnoutStore,
    ledger: RiskLedger<'a>,
    alerts: AlertEngine<'a>,
}

impl<'a> WorkHourIntake<'a> {
    pub fn new(store: &'a BurnoutStore, ledger: RiskLedger<'a>, alerts: AlertEngine<'a>) -> Self {
        Self { store, ledger, alerts }
    }

    pub fn record(&self, new: &NewWorkHours) -> EngineResult<IntakeOutcome> {
        validate_hours(new.hours_worked, new.overtime_hours)?;
        if !self.store.staff_exists(new.staff_id)? {
            return Err(EngineError::StaffNotFound { staff_id: new.staff_id });
        }
        if self
            .store
            .find_work_hours_on(new.staff_id, new.work_date)?
            .is_some()
        {
            return Err(EngineError::DuplicateWorkHours {
                staff_id: new.staff_id,
                date: new.work_date,
            });
        }

        let entry_id = self.store.insert_work_hours(
            new.staff_id,
            new.work_date,
            new.hours_worked,
            new.overtime_hours,
        )?;
        let entry = WorkHourEntry {
            entry_id,
            staff_id: new.staff_id,
            work_date: new.work_date,
            hours_worked: new.hours_worked,
            overtime_hours: new.overtime_hours,
        };
        let (updated_risk, alert) = self.recalculate(entry.staff_id, Some(entry.work_date));
        Ok(IntakeOutcome { entry, updated_risk, alert })
    }

    pub fn amend(&self, entry_id: EntryId, patch: &WorkHoursPatch) -> EngineResult<IntakeOutcome> {
        let existing = self
            .store
            .get_work_hours(entry_id)?
            .ok_or(EngineError::WorkHoursNotFound { entry_id })?;
        let hours_worked = patch.hours_worked.unwrap_or(existing.hours_worked);
        let overtime_hours = patch.overtime_hours.unwrap_or(existing.overtime_hours);
        validate_hours(hours_worked, overtime_hours)?;

        self.store
            .update_work_hours(entry_id, hours_worked, overtime_hours)?;
        let entry = WorkHourEntry {
            hours_worked,
            overtime_hours,
            ..existing
        };
        let (updated_risk, alert) = self.recalculate(entry.staff_id, Some(entry.work_date));
        Ok(IntakeOutcome { entry, updated_risk, alert })
    }

    /// Delete an entry and rescore the staff member as of today.
    pub fn remove(&self, entry_id: EntryId) -> EngineResult<RemovalOutcome> {
        let removed = self
            .store
            .get_work_hours(entry_id)?
            .ok_or(EngineError::WorkHoursNotFound { entry_id })?;
        if self.store.delete_work_hours(entry_id)? == 0 {
            return Err(EngineError::WorkHoursNotFound { entry_id });
        }
        let (updated_risk, alert) = self.recalculate(removed.staff_id, None);
        Ok(RemovalOutcome { removed, updated_risk, alert })
    }

    fn recalculate(
        &self,
        staff_id: StaffId,
        date: Option<NaiveDate>,
    ) -> (Option<RiskScoreRecord>, Option<AlertOutcome>) {
        let previous = match self.ledger.previous_score(staff_id) {
            Ok(previous) => previous,
            Err(e) => {
                log::warn!("staff={staff_id} intake: previous score unavailable: {e}");
                None
            }
        };

        let update = match self.ledger.update_staff_risk_score(staff_id, date) {
            Ok(update) => update,
            Err(e) => {
                log::warn!("staff={staff_id} intake: risk score not updated: {e}");
                return (None, None);
            }
        };

        let alert = if update.assessment.is_high_risk() {
            match self.alerts.process_assessment(&update.assessment, previous) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("staff={staff_id} intake: alert not processed: {e}");
                    None
                }
            }
        } else {
            None
        };
        (Some(update.record), alert)
    }
}
