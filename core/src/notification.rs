//! Notification sinks for high-risk alerts.
//!
//! Delivery is best effort. The alert engine calls a sink after the alert
//! row is written and only logs a failure.

use std::any::Any;
use std::fmt::Write;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, EngineResult},
    risk_scoring::{RiskFactors, RiskLevel},
    roster::StaffMember,
};

/// Payload handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighRiskNotice {
    pub staff:        StaffMember,
    pub risk_score:   f64,
    pub factors:      Option<RiskFactors>,
    pub generated_at: DateTime<Utc>,
}

impl HighRiskNotice {
    pub fn subject(&self) -> String {
        format!(
            "{} RISK ALERT: {} - Burnout Risk Score {}",
            RiskLevel::from_score(self.risk_score).headline(),
            self.staff.name,
            self.risk_score
        )
    }

    pub fn body(&self) -> String {
        let mut out = String::new();
        let level = RiskLevel::from_score(self.risk_score);

        let _ = writeln!(out, "URGENT: {} Burnout Risk Alert", level);
        let _ = writeln!(out);
        let _ = writeln!(out, "Staff Member: {}", self.staff.name);
        let _ = writeln!(out, "Department: {}", self.staff.department);
        let _ = writeln!(out, "Role: {}", self.staff.role);
        let _ = writeln!(
            out,
            "Current Risk Score: {}/100 ({} RISK)",
            self.risk_score,
            level.headline()
        );

        let factor_lines = self.factors.map(factor_lines).unwrap_or_default();
        if !factor_lines.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "CONTRIBUTING RISK FACTORS:");
            for line in factor_lines {
                let _ = writeln!(out, "- {line}");
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "IMMEDIATE ACTION RECOMMENDED:");
        for action in [
            "Review staff member's current workload",
            "Consider reducing overtime hours",
            "Evaluate need for additional rest days",
            "Schedule check-in meeting with staff member",
            "Monitor closely for signs of burnout",
        ] {
            let _ = writeln!(out, "- {action}");
        }
        let _ = writeln!(out);
        let _ = write!(
            out,
            "Generated: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        out
    }
}

/// Human-readable lines for each non-zero factor. Worded from the points
/// alone; the raw hours are not part of the stored factors.
fn factor_lines(factors: RiskFactors) -> Vec<String> {
    let mut lines = Vec::new();
    if factors.consecutive_days_points > 0.0 {
        lines.push(format!(
            "Consecutive work days (+{} points)",
            factors.consecutive_days_points
        ));
    }
    if factors.overtime_hours_points > 0.0 {
        lines.push(format!(
            "Overtime hours this week (+{} points)",
            factors.overtime_hours_points
        ));
    }
    if factors.weekly_hours_points > 0.0 {
        lines.push(format!(
            "Working more than 60 hours this week (+{} points)",
            factors.weekly_hours_points
        ));
    }
    if factors.weekend_work_points > 0.0 {
        lines.push(format!(
            "Weekend work this month (+{} points)",
            factors.weekend_work_points
        ));
    }
    lines
}

pub trait NotificationSink: Send {
    fn deliver(&self, notice: &HighRiskNotice) -> EngineResult<()>;

    /// For downcasting in tests and tooling only.
    fn as_any(&self) -> &dyn Any;
}

/// Writes rendered notices to the log, addressed to the manager.
pub struct LogNotificationSink {
    recipient: String,
}

impl LogNotificationSink {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self { recipient: recipient.into() }
    }
}

impl NotificationSink for LogNotificationSink {
    fn deliver(&self, notice: &HighRiskNotice) -> EngineResult<()> {
        if self.recipient.trim().is_empty() {
            return Err(EngineError::NotificationDelivery {
                reason: "no manager address configured".into(),
            });
        }
        log::info!(
            target: "notification",
            "to={} subject={:?}\n{}",
            self.recipient,
            notice.subject(),
            notice.body()
        );
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Keeps every delivered notice in memory.
#[derive(Default)]
pub struct RecordingSink {
    notices: Mutex<Vec<HighRiskNotice>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<HighRiskNotice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, notice: &HighRiskNotice) -> EngineResult<()> {
        let mut notices = self.notices.lock().map_err(|_| EngineError::NotificationDelivery {
            reason: "recording sink poisoned".into(),
        })?;
        notices.push(notice.clone());
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
