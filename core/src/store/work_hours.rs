//! Work-hours queries.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::BurnoutStore;
use crate::{
    error::EngineResult,
    repository::WorkHourSource,
    types::{EntryId, StaffId},
    work_history::WorkHourEntry,
};

const ENTRY_COLUMNS: &str = "entry_id, staff_id, work_date, hours_worked, overtime_hours";

fn entry_from_row(r: &Row<'_>) -> rusqlite::Result<WorkHourEntry> {
    Ok(WorkHourEntry {
        entry_id: r.get(0)?,
        staff_id: r.get(1)?,
        work_date: r.get(2)?,
        hours_worked: r.get(3)?,
        overtime_hours: r.get(4)?,
    })
}

impl BurnoutStore {
    pub fn insert_work_hours(
        &self,
        staff_id: StaffId,
        work_date: NaiveDate,
        hours_worked: f64,
        overtime_hours: f64,
    ) -> EngineResult<EntryId> {
        self.conn.execute(
            "INSERT INTO work_hours (staff_id, work_date, hours_worked, overtime_hours)
             VALUES (?1, ?2, ?3, ?4)",
            params![staff_id, work_date, hours_worked, overtime_hours],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_work_hours(
        &self,
        entry_id: EntryId,
        hours_worked: f64,
        overtime_hours: f64,
    ) -> EngineResult<usize> {
        let changed = self.conn.execute(
            "UPDATE work_hours SET hours_worked = ?1, overtime_hours = ?2
             WHERE entry_id = ?3",
            params![hours_worked, overtime_hours, entry_id],
        )?;
        Ok(changed)
    }

    pub fn delete_work_hours(&self, entry_id: EntryId) -> EngineResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM work_hours WHERE entry_id = ?1", params![entry_id])?;
        Ok(changed)
    }

    pub fn get_work_hours(&self, entry_id: EntryId) -> EngineResult<Option<WorkHourEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM work_hours WHERE entry_id = ?1"),
                params![entry_id],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn find_work_hours_on(
        &self,
        staff_id: StaffId,
        work_date: NaiveDate,
    ) -> EngineResult<Option<WorkHourEntry>> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM work_hours
                     WHERE staff_id = ?1 AND work_date = ?2"
                ),
                params![staff_id, work_date],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }
}

impl WorkHourSource for BurnoutStore {
    fn find_by_staff_and_date_range(
        &self,
        staff_id: StaffId,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> EngineResult<Vec<WorkHourEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM work_hours
             WHERE staff_id = ?1 AND work_date >= ?2 AND work_date <= ?3
             ORDER BY work_date ASC"
        ))?;
        let rows = stmt.query_map(params![staff_id, date_from, date_to], entry_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn find_recent_by_staff(
        &self,
        staff_id: StaffId,
        max_date: NaiveDate,
        limit: usize,
    ) -> EngineResult<Vec<WorkHourEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM work_hours
             WHERE staff_id = ?1 AND work_date <= ?2 AND hours_worked > 0
             ORDER BY work_date DESC
             LIMIT ?3"
        ))?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![staff_id, max_date, limit], entry_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
