//! Staff roster queries.

use rusqlite::{params, OptionalExtension, Row};

use super::BurnoutStore;
use crate::{
    error::EngineResult,
    repository::StaffDirectory,
    roster::{NewStaffMember, StaffMember},
    types::StaffId,
};

const STAFF_COLUMNS: &str = "staff_id, name, email, department, role, hire_date";

fn staff_from_row(r: &Row<'_>) -> rusqlite::Result<StaffMember> {
    Ok(StaffMember {
        staff_id: r.get(0)?,
        name: r.get(1)?,
        email: r.get(2)?,
        department: r.get(3)?,
        role: r.get(4)?,
        hire_date: r.get(5)?,
    })
}

impl BurnoutStore {
    pub fn insert_staff(&self, staff: &NewStaffMember) -> EngineResult<StaffId> {
        self.conn.execute(
            "INSERT INTO staff (name, email, department, role, hire_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                staff.name,
                staff.email,
                staff.department,
                staff.role,
                staff.hire_date
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_staff(&self) -> EngineResult<Vec<StaffMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {STAFF_COLUMNS} FROM staff ORDER BY name, staff_id"))?;
        let rows = stmt.query_map([], staff_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn staff_exists(&self, staff_id: StaffId) -> EngineResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM staff WHERE staff_id = ?1",
            params![staff_id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }
}

impl StaffDirectory for BurnoutStore {
    fn find_staff(&self, staff_id: StaffId) -> EngineResult<Option<StaffMember>> {
        let staff = self
            .conn
            .query_row(
                &format!("SELECT {STAFF_COLUMNS} FROM staff WHERE staff_id = ?1"),
                params![staff_id],
                staff_from_row,
            )
            .optional()?;
        Ok(staff)
    }
}
