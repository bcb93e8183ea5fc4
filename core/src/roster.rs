//! Staff roster records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::StaffId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub staff_id:   StaffId,
    pub name:       String,
    pub email:      String,
    pub department: String,
    pub role:       String,
    pub hire_date:  NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStaffMember {
    pub name:       String,
    pub email:      String,
    pub department: String,
    pub role:       String,
    pub hire_date:  NaiveDate,
}
