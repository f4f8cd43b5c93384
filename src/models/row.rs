//! Staff rows joined with today's attendance.

use std::collections::HashMap;

use super::attendance::{AttendanceRecord, AttendanceStatus, check_in};
use super::staff::StaffMember;

/// One table row: a staff member and their status for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub id: String,
    pub name: String,
    pub department: String,
    pub status: AttendanceStatus,
    pub check_in: String,
}

impl DisplayRow {
    /// Row for a staff member with no record today.
    pub fn absent(staff: StaffMember) -> Self {
        Self {
            id: staff.id,
            name: staff.name,
            department: staff.department,
            status: AttendanceStatus::Absent,
            check_in: check_in::NONE.to_string(),
        }
    }

    /// Whether the "Mark Present" action is offered for this row.
    pub fn can_mark_present(&self) -> bool {
        !self.status.is_present()
    }
}

/// Join staff with attendance by staff id.
///
/// Every staff member yields exactly one row, in staff order. When several
/// records share a staff id the first one wins.
pub fn merge_attendance(staff: Vec<StaffMember>, attendance: &[AttendanceRecord]) -> Vec<DisplayRow> {
    let mut by_staff: HashMap<&str, &AttendanceRecord> = HashMap::with_capacity(attendance.len());
    for record in attendance {
        by_staff.entry(record.staff_id.as_str()).or_insert(record);
    }

    staff
        .into_iter()
        .map(|person| match by_staff.get(person.id.as_str()) {
            Some(record) => DisplayRow {
                status: record.status,
                check_in: record.check_in.clone(),
                ..DisplayRow::absent(person)
            },
            None => DisplayRow::absent(person),
        })
        .collect()
}
