//! Burnout risk scoring.
//!
//! Score = base 20
//!       + min(consecutive days x 10, 30)
//!       + min(weekly overtime hours x 15, 25)
//!       + 20 if the week exceeds 60 total hours
//!       + min(weekends worked this month x 5, 15)
//! capped at 100.
//!
//! The tier cut points (41 Medium, 71 High) are a public contract:
//! dashboards and alerting key off these exact values.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    error::{EngineError, EngineResult},
    types::StaffId,
    work_history::{HistorySummary, WorkHistoryAggregator},
};

pub const BASE_SCORE: f64 = 20.0;
pub const POINTS_PER_CONSECUTIVE_DAY: f64 = 10.0;
pub const MAX_CONSECUTIVE_POINTS: f64 = 30.0;
pub const POINTS_PER_OVERTIME_HOUR: f64 = 15.0;
pub const MAX_OVERTIME_POINTS: f64 = 25.0;
pub const WEEKLY_HOURS_LIMIT: f64 = 60.0;
pub const WEEKLY_HOURS_POINTS: f64 = 20.0;
pub const POINTS_PER_WEEKEND: f64 = 5.0;
pub const MAX_WEEKEND_POINTS: f64 = 15.0;
pub const MAX_SCORE: f64 = 100.0;

/// Lowest score classified Medium.
pub const MEDIUM_RISK_FLOOR: f64 = 41.0;
/// Lowest score classified High, and the alerting threshold.
pub const HIGH_RISK_THRESHOLD: f64 = 71.0;

const LOW_RISK_CEILING: f64 = 40.0;
const MEDIUM_RISK_CEILING: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score <= LOW_RISK_CEILING {
            Self::Low
        } else if score <= MEDIUM_RISK_CEILING {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Upper-case label used in alert messages.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Points awarded per factor. Persisted as JSON alongside each score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFactors {
    pub base_score:              f64,
    pub consecutive_days_points: f64,
    pub overtime_hours_points:   f64,
    pub weekly_hours_points:     f64,
    pub weekend_work_points:     f64,
}

impl RiskFactors {
    pub fn from_history(history: &HistorySummary) -> Self {
        let weekly_hours_points = if history.weekly_hours > WEEKLY_HOURS_LIMIT {
            WEEKLY_HOURS_POINTS
        } else {
            0.0
        };
        Self {
            base_score: BASE_SCORE,
            consecutive_days_points: (f64::from(history.consecutive_days)
                * POINTS_PER_CONSECUTIVE_DAY)
                .min(MAX_CONSECUTIVE_POINTS),
            overtime_hours_points: (history.weekly_overtime * POINTS_PER_OVERTIME_HOUR)
                .min(MAX_OVERTIME_POINTS),
            weekly_hours_points,
            weekend_work_points: (f64::from(history.weekend_days) * POINTS_PER_WEEKEND)
                .min(MAX_WEEKEND_POINTS),
        }
    }

    pub fn total(&self) -> f64 {
        self.base_score
            + self.consecutive_days_points
            + self.overtime_hours_points
            + self.weekly_hours_points
            + self.weekend_work_points
    }

    /// Final capped score.
    pub fn score(&self) -> f64 {
        self.total().min(MAX_SCORE)
    }
}

/// A computed score with everything that went into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub staff_id:         StaffId,
    pub calculated_date:  NaiveDate,
    pub score:            f64,
    pub risk_level:       RiskLevel,
    pub factors:          RiskFactors,
    pub consecutive_days: u32,
    pub weekly_overtime:  f64,
    pub weekly_hours:     f64,
    pub weekend_days:     u32,
}

impl RiskAssessment {
    pub fn from_history(
        staff_id: StaffId,
        calculated_date: NaiveDate,
        history: &HistorySummary,
    ) -> Self {
        let factors = RiskFactors::from_history(history);
        let score = factors.score();
        Self {
            staff_id,
            calculated_date,
            score,
            risk_level: RiskLevel::from_score(score),
            factors,
            consecutive_days: history.consecutive_days,
            weekly_overtime: history.weekly_overtime,
            weekly_hours: history.weekly_hours,
            weekend_days: history.weekend_days,
        }
    }

    pub fn is_high_risk(&self) -> bool {
        self.score >= HIGH_RISK_THRESHOLD
    }
}

pub struct RiskScorer<'a> {
    history: WorkHistoryAggregator<'a>,
    clock:   &'a dyn Clock,
}

impl<'a> RiskScorer<'a> {
    pub fn new(history: WorkHistoryAggregator<'a>, clock: &'a dyn Clock) -> Self {
        Self { history, clock }
    }

    /// Score `staff_id` as of `target_date` (today when `None`).
    pub fn calculate_risk_score(
        &self,
        staff_id: StaffId,
        target_date: Option<NaiveDate>,
    ) -> EngineResult<RiskAssessment> {
        let date = target_date.unwrap_or_else(|| self.clock.today());
        let history = self.history.summarize(staff_id, date);
        check_history(staff_id, &history)?;

        let assessment = RiskAssessment::from_history(staff_id, date, &history);
        log::debug!(
            "staff={staff_id} date={date} risk: score={} level={} streak={} overtime={:.1} weekly={:.1} weekends={}",
            assessment.score,
            assessment.risk_level,
            history.consecutive_days,
            history.weekly_overtime,
            history.weekly_hours,
            history.weekend_days,
        );
        Ok(assessment)
    }
}

fn check_history(staff_id: StaffId, history: &HistorySummary) -> EngineResult<()> {
    let sums = [
        ("weekly overtime", history.weekly_overtime),
        ("weekly hours", history.weekly_hours),
    ];
    for (label, value) in sums {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::RiskCalculation {
                staff_id,
                reason: format!("{label} is {value}"),
            });
        }
    }
    Ok(())
}
