//! Risk score persistence and read models.

use chrono::NaiveDate;
use rusqlite::{
    params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
    OptionalExtension, Row, ToSql,
};

use super::BurnoutStore;
use crate::{
    dashboard::StaffRiskSummary,
    error::EngineResult,
    repository::RiskScoreRepository,
    risk_ledger::{NewRiskScore, RiskScoreRecord},
    risk_scoring::{RiskFactors, RiskLevel, BASE_SCORE},
    types::{RiskScoreId, StaffId},
};

// Tier names and factor JSON are only encoded at this boundary.

impl ToSql for RiskLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RiskLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        RiskLevel::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("unknown risk level {text:?}").into()))
    }
}

impl ToSql for RiskFactors {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let json = serde_json::to_string(self)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(json))
    }
}

impl FromSql for RiskFactors {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        serde_json::from_str(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

const SCORE_COLUMNS: &str = "score_id, staff_id, score_date, score, risk_level, factors";

fn record_from_row(r: &Row<'_>) -> rusqlite::Result<RiskScoreRecord> {
    Ok(RiskScoreRecord {
        score_id: r.get(0)?,
        staff_id: r.get(1)?,
        score_date: r.get(2)?,
        score: r.get(3)?,
        risk_level: r.get(4)?,
        factors: r.get(5)?,
    })
}

fn summary_from_row(r: &Row<'_>) -> rusqlite::Result<StaffRiskSummary> {
    Ok(StaffRiskSummary {
        staff_id: r.get(0)?,
        name: r.get(1)?,
        department: r.get(2)?,
        role: r.get(3)?,
        score: r.get(4)?,
        risk_level: r.get(5)?,
        factors: r.get(6)?,
        risk_date: r.get(7)?,
    })
}

/// Staff joined with the score row carrying their latest date.
const LATEST_SCORE_JOIN: &str = "FROM staff s
     LEFT JOIN risk_score rs ON rs.staff_id = s.staff_id
        AND rs.score_date = (
            SELECT MAX(rs2.score_date) FROM risk_score rs2
            WHERE rs2.staff_id = s.staff_id
        )";

impl BurnoutStore {
    pub fn risk_score_count(&self, staff_id: StaffId) -> EngineResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM risk_score WHERE staff_id = ?1",
            params![staff_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }

    pub fn current_risk_scores(&self) -> EngineResult<Vec<StaffRiskSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT s.staff_id, s.name, s.department, s.role,
                    rs.score, rs.risk_level, rs.factors, rs.score_date
             {LATEST_SCORE_JOIN}
             ORDER BY rs.score IS NULL, rs.score DESC, s.name"
        ))?;
        let rows = stmt.query_map([], summary_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Staff count per tier of their latest score; unscored staff count as Low.
    pub fn risk_level_counts(&self) -> EngineResult<Vec<(RiskLevel, i64)>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT COALESCE(rs.risk_level, 'Low') AS level, COUNT(*)
             {LATEST_SCORE_JOIN}
             GROUP BY level"
        ))?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, RiskLevel>(0)?, r.get::<_, i64>(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn top_risk_staff(&self, limit: usize) -> EngineResult<Vec<StaffRiskSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT s.staff_id, s.name, s.department, s.role,
                    COALESCE(rs.score, ?1) AS effective_score,
                    COALESCE(rs.risk_level, 'Low'), rs.factors, rs.score_date
             {LATEST_SCORE_JOIN}
             ORDER BY effective_score DESC, s.name
             LIMIT ?2"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![BASE_SCORE, limit], summary_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn risk_history_since(
        &self,
        staff_id: StaffId,
        since: NaiveDate,
    ) -> EngineResult<Vec<RiskScoreRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCORE_COLUMNS} FROM risk_score
             WHERE staff_id = ?1 AND score_date >= ?2
             ORDER BY score_date DESC"
        ))?;
        let rows = stmt.query_map(params![staff_id, since], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

impl RiskScoreRepository for BurnoutStore {
    fn get_risk_score(
        &self,
        staff_id: StaffId,
        date: NaiveDate,
    ) -> EngineResult<Option<RiskScoreRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SCORE_COLUMNS} FROM risk_score
                     WHERE staff_id = ?1 AND score_date = ?2"
                ),
                params![staff_id, date],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn latest_risk_score(&self, staff_id: StaffId) -> EngineResult<Option<RiskScoreRecord>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SCORE_COLUMNS} FROM risk_score
                     WHERE staff_id = ?1
                     ORDER BY score_date DESC LIMIT 1"
                ),
                params![staff_id],
                record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn upsert_risk_score(&self, score: &NewRiskScore) -> EngineResult<RiskScoreId> {
        let score_id = self.conn.query_row(
            "INSERT INTO risk_score (staff_id, score_date, score, risk_level, factors)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (staff_id, score_date) DO UPDATE SET
                score = excluded.score,
                risk_level = excluded.risk_level,
                factors = excluded.factors
             RETURNING score_id",
            params![
                score.staff_id,
                score.score_date,
                score.score,
                score.risk_level,
                score.factors
            ],
            |r| r.get(0),
        )?;
        Ok(score_id)
    }
}
