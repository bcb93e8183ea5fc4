//! Alert decisions for high burnout risk.
//!
//! Lifecycle:
//!   [none] -> Active (created)
//!          -> Active (refreshed: same id, new score and message)
//!          -> Resolved (terminal, by a manager)
//!
//! At most one unresolved alert exists per staff member. A qualifying
//! score after resolution opens a new alert with a new id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    error::{EngineError, EngineResult},
    notification::{HighRiskNotice, NotificationSink},
    repository::{AlertRepository, StaffDirectory},
    risk_scoring::{RiskAssessment, RiskFactors, RiskLevel, HIGH_RISK_THRESHOLD},
    roster::StaffMember,
    types::{AlertId, StaffId},
};

/// A rise larger than this re-alerts a staff member who is already high risk.
pub const ESCALATION_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id:    AlertId,
    pub staff_id:    StaffId,
    pub message:     String,
    pub risk_score:  f64,
    pub resolved:    bool,
    pub created_at:  DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAlert {
    pub staff_id:   StaffId,
    pub message:    String,
    pub risk_score: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    Raised,
    Refreshed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertOutcome {
    pub alert_id: AlertId,
    pub action:   AlertAction,
}

/// Hysteresis rule: alert on entering the high band, or on a jump of more
/// than `ESCALATION_MARGIN` while already in it.
pub fn should_create_alert(new_score: f64, previous_score: Option<f64>) -> bool {
    if new_score < HIGH_RISK_THRESHOLD {
        return false;
    }
    match previous_score {
        None => true,
        Some(previous) => {
            previous < HIGH_RISK_THRESHOLD || new_score > previous + ESCALATION_MARGIN
        }
    }
}

pub fn alert_message(staff: &StaffMember, risk_score: f64) -> String {
    format!(
        "{} RISK ALERT: {} ({} - {}) has a burnout risk score of {}. Immediate attention recommended.",
        RiskLevel::from_score(risk_score).headline(),
        staff.name,
        staff.department,
        staff.role,
        risk_score
    )
}

pub struct AlertEngine<'a> {
    alerts: &'a dyn AlertRepository,
    staff:  &'a dyn StaffDirectory,
    sink:   &'a dyn NotificationSink,
    clock:  &'a dyn Clock,
}

impl<'a> AlertEngine<'a> {
    pub fn new(
        alerts: &'a dyn AlertRepository,
        staff: &'a dyn StaffDirectory,
        sink: &'a dyn NotificationSink,
        clock: &'a dyn Clock,
    ) -> Self {
        Self { alerts, staff, sink, clock }
    }

    pub fn process_risk_score_change(
        &self,
        staff_id: StaffId,
        new_score: f64,
        previous_score: Option<f64>,
    ) -> EngineResult<Option<AlertOutcome>> {
        if !should_create_alert(new_score, previous_score) {
            log::debug!(
                "staff={staff_id} alert: no action for score {new_score} (previous {previous_score:?})"
            );
            return Ok(None);
        }
        self.create_alert(staff_id, new_score).map(Some)
    }

    /// Same decision as `process_risk_score_change`, with the assessment's
    /// factors carried into the notification.
    pub fn process_assessment(
        &self,
        assessment: &RiskAssessment,
        previous_score: Option<f64>,
    ) -> EngineResult<Option<AlertOutcome>> {
        if !should_create_alert(assessment.score, previous_score) {
            return Ok(None);
        }
        self.raise_or_refresh(assessment.staff_id, assessment.score, Some(assessment.factors))
            .map(Some)
    }

    /// Open an alert, or refresh the one already open for `staff_id`.
    pub fn create_alert(&self, staff_id: StaffId, risk_score: f64) -> EngineResult<AlertOutcome> {
        self.raise_or_refresh(staff_id, risk_score, None)
    }

    fn raise_or_refresh(
        &self,
        staff_id: StaffId,
        risk_score: f64,
        factors: Option<RiskFactors>,
    ) -> EngineResult<AlertOutcome> {
        let staff = self
            .staff
            .find_staff(staff_id)?
            .ok_or(EngineError::StaffNotFound { staff_id })?;
        let message = alert_message(&staff, risk_score);

        let outcome = match self.alerts.find_unresolved_by_staff(staff_id)? {
            Some(open) => {
                self.alerts.refresh_alert(open.alert_id, risk_score, &message)?;
                AlertOutcome { alert_id: open.alert_id, action: AlertAction::Refreshed }
            }
            None => {
                let alert_id = self.alerts.insert_alert(&NewAlert {
                    staff_id,
                    message,
                    risk_score,
                    created_at: self.clock.now(),
                })?;
                AlertOutcome { alert_id, action: AlertAction::Raised }
            }
        };
        log::info!(
            "staff={staff_id} alert: {:?} alert {} at score {risk_score}",
            outcome.action,
            outcome.alert_id
        );

        self.notify(staff, risk_score, factors);
        Ok(outcome)
    }

    pub fn resolve_alert(&self, alert_id: AlertId) -> EngineResult<()> {
        let changed = self.alerts.mark_resolved(alert_id, self.clock.now())?;
        if changed == 0 {
            return Err(EngineError::AlertNotFound { alert_id });
        }
        log::info!("alert {alert_id} resolved");
        Ok(())
    }

    fn notify(&self, staff: StaffMember, risk_score: f64, factors: Option<RiskFactors>) {
        let staff_id = staff.staff_id;
        let notice = HighRiskNotice {
            staff,
            risk_score,
            factors,
            generated_at: self.clock.now(),
        };
        if let Err(e) = self.sink.deliver(&notice) {
            log::error!("staff={staff_id} alert: notification not delivered: {e}");
        }
    }
}
