//! Persisted risk scores: one record per (staff, date).
//!
//! Recomputing for the same staff and date replaces the stored values in
//! place. It never appends a second row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::EngineResult,
    repository::RiskScoreRepository,
    risk_scoring::{RiskAssessment, RiskFactors, RiskLevel, RiskScorer},
    types::{RiskScoreId, StaffId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreRecord {
    pub score_id:   RiskScoreId,
    pub staff_id:   StaffId,
    pub score_date: NaiveDate,
    pub score:      f64,
    pub risk_level: RiskLevel,
    pub factors:    RiskFactors,
}

/// Values written by an upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRiskScore {
    pub staff_id:   StaffId,
    pub score_date: NaiveDate,
    pub score:      f64,
    pub risk_level: RiskLevel,
    pub factors:    RiskFactors,
}

impl NewRiskScore {
    pub fn from_assessment(staff_id: StaffId, assessment: &RiskAssessment) -> Self {
        Self {
            staff_id,
            score_date: assessment.calculated_date,
            score: assessment.score,
            risk_level: assessment.risk_level,
            factors: assessment.factors,
        }
    }

    fn into_record(self, score_id: RiskScoreId) -> RiskScoreRecord {
        RiskScoreRecord {
            score_id,
            staff_id: self.staff_id,
            score_date: self.score_date,
            score: self.score,
            risk_level: self.risk_level,
            factors: self.factors,
        }
    }
}

/// The stored record together with the assessment that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskUpdate {
    pub record:     RiskScoreRecord,
    pub assessment: RiskAssessment,
}

pub struct RiskLedger<'a> {
    scorer: RiskScorer<'a>,
    scores: &'a dyn RiskScoreRepository,
}

impl<'a> RiskLedger<'a> {
    pub fn new(scorer: RiskScorer<'a>, scores: &'a dyn RiskScoreRepository) -> Self {
        Self { scorer, scores }
    }

    pub fn save_risk_score(
        &self,
        staff_id: StaffId,
        assessment: &RiskAssessment,
    ) -> EngineResult<RiskScoreRecord> {
        let row = NewRiskScore::from_assessment(staff_id, assessment);
        let score_id = self.scores.upsert_risk_score(&row)?;
        Ok(row.into_record(score_id))
    }

    /// Score and persist. The entry point after any work-hours change.
    pub fn update_staff_risk_score(
        &self,
        staff_id: StaffId,
        target_date: Option<NaiveDate>,
    ) -> EngineResult<RiskUpdate> {
        let assessment = self.scorer.calculate_risk_score(staff_id, target_date)?;
        let record = self.save_risk_score(staff_id, &assessment)?;
        Ok(RiskUpdate { record, assessment })
    }

    pub fn previous_score(&self, staff_id: StaffId) -> EngineResult<Option<f64>> {
        Ok(self.scores.latest_risk_score(staff_id)?.map(|r| r.score))
    }
}
