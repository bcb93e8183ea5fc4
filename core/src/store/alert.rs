//! Alert persistence and alert read models.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::BurnoutStore;
use crate::{
    alerting::{Alert, NewAlert},
    dashboard::{AlertStats, AlertView, Pagination},
    error::EngineResult,
    repository::AlertRepository,
    types::{AlertId, StaffId},
};

const ALERT_COLUMNS: &str =
    "alert_id, staff_id, message, risk_score, resolved, created_at, resolved_at";

const ALERT_VIEW_SELECT: &str = "SELECT a.alert_id, a.staff_id, s.name, s.department, s.role,
            a.message, a.risk_score, a.resolved, a.created_at, a.resolved_at
     FROM alert a
     JOIN staff s ON s.staff_id = a.staff_id";

fn alert_from_row(r: &Row<'_>) -> rusqlite::Result<Alert> {
    Ok(Alert {
        alert_id: r.get(0)?,
        staff_id: r.get(1)?,
        message: r.get(2)?,
        risk_score: r.get(3)?,
        resolved: r.get(4)?,
        created_at: r.get(5)?,
        resolved_at: r.get(6)?,
    })
}

fn view_from_row(r: &Row<'_>) -> rusqlite::Result<AlertView> {
    Ok(AlertView {
        alert_id: r.get(0)?,
        staff_id: r.get(1)?,
        staff_name: r.get(2)?,
        department: r.get(3)?,
        role: r.get(4)?,
        message: r.get(5)?,
        risk_score: r.get(6)?,
        resolved: r.get(7)?,
        created_at: r.get(8)?,
        resolved_at: r.get(9)?,
    })
}

impl BurnoutStore {
    pub fn get_alert(&self, alert_id: AlertId) -> EngineResult<Option<Alert>> {
        let alert = self
            .conn
            .query_row(
                &format!("SELECT {ALERT_COLUMNS} FROM alert WHERE alert_id = ?1"),
                params![alert_id],
                alert_from_row,
            )
            .optional()?;
        Ok(alert)
    }

    pub fn alerts_for_staff(&self, staff_id: StaffId) -> EngineResult<Vec<Alert>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ALERT_COLUMNS} FROM alert
             WHERE staff_id = ?1
             ORDER BY alert_id ASC"
        ))?;
        let rows = stmt.query_map(params![staff_id], alert_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Open alerts, highest score first.
    pub fn active_alert_views(&self) -> EngineResult<Vec<AlertView>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ALERT_VIEW_SELECT}
             WHERE a.resolved = 0
             ORDER BY a.risk_score DESC, a.created_at DESC"
        ))?;
        let rows = stmt.query_map([], view_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// One page of alerts, newest first, plus the total matching count.
    pub fn alert_views_page(
        &self,
        page: u32,
        limit: u32,
        resolved: Option<bool>,
    ) -> EngineResult<(Vec<AlertView>, i64)> {
        let mut stmt = self.conn.prepare(&format!(
            "{ALERT_VIEW_SELECT}
             WHERE (?1 IS NULL OR a.resolved = ?1)
             ORDER BY a.created_at DESC, a.alert_id DESC
             LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt.query_map(
            params![resolved, i64::from(limit), Pagination::offset(page, limit)],
            view_from_row,
        )?;
        let alerts = rows.collect::<Result<Vec<_>, _>>()?;

        let total: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM alert WHERE (?1 IS NULL OR resolved = ?1)",
            params![resolved],
            |r| r.get(0),
        )?;
        Ok((alerts, total))
    }

    pub fn alert_stats_since(&self, since: DateTime<Utc>) -> EngineResult<AlertStats> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*),
                    COUNT(CASE WHEN resolved = 0 THEN 1 END),
                    COUNT(CASE WHEN resolved = 1 THEN 1 END),
                    COUNT(CASE WHEN created_at >= ?1 THEN 1 END)
             FROM alert",
            params![since],
            |r| {
                Ok(AlertStats {
                    total_alerts: r.get(0)?,
                    active_alerts: r.get(1)?,
                    resolved_alerts: r.get(2)?,
                    alerts_this_week: r.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}

impl AlertRepository for BurnoutStore {
    fn find_unresolved_by_staff(&self, staff_id: StaffId) -> EngineResult<Option<Alert>> {
        let alert = self
            .conn
            .query_row(
                &format!(
                    "SELECT {ALERT_COLUMNS} FROM alert
                     WHERE staff_id = ?1 AND resolved = 0
                     ORDER BY created_at DESC LIMIT 1"
                ),
                params![staff_id],
                alert_from_row,
            )
            .optional()?;
        Ok(alert)
    }

    fn insert_alert(&self, alert: &NewAlert) -> EngineResult<AlertId> {
        self.conn.execute(
            "INSERT INTO alert (staff_id, message, risk_score, resolved, created_at)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![alert.staff_id, alert.message, alert.risk_score, alert.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn refresh_alert(
        &self,
        alert_id: AlertId,
        risk_score: f64,
        message: &str,
    ) -> EngineResult<()> {
        self.conn.execute(
            "UPDATE alert SET risk_score = ?1, message = ?2
             WHERE alert_id = ?3 AND resolved = 0",
            params![risk_score, message, alert_id],
        )?;
        Ok(())
    }

    fn mark_resolved(&self, alert_id: AlertId, resolved_at: DateTime<Utc>) -> EngineResult<usize> {
        let changed = self.conn.execute(
            "UPDATE alert SET resolved = 1, resolved_at = ?1
             WHERE alert_id = ?2 AND resolved = 0",
            params![resolved_at, alert_id],
        )?;
        Ok(changed)
    }
}
