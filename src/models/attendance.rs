//! Attendance DTOs.

use serde::{Deserialize, Serialize};

/// Attendance status for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, AttendanceStatus::Present)
    }
}

/// Today's attendance record for one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub staff_id: String,
    pub status: AttendanceStatus,
    pub check_in: String,
}

/// Request body for `POST /api/attendance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    pub staff_id: String,
    pub status: AttendanceStatus,
    pub check_in: String,
}

impl MarkAttendance {
    /// Mark a staff member present at the given server-formatted time.
    pub fn present(staff_id: impl Into<String>, check_in: impl Into<String>) -> Self {
        Self {
            staff_id: staff_id.into(),
            status: AttendanceStatus::Present,
            check_in: check_in.into(),
        }
    }
}

/// Check-in time formatting.
///
/// The value sent to the server and the value shown in the table are
/// formatted separately and are not expected to match.
pub mod check_in {
    use chrono::{DateTime, Local, TimeZone};

    /// Placeholder shown when there is no check-in.
    pub const NONE: &str = "-";

    /// Time sent with the attendance write, e.g. `9:05:03 AM`.
    pub fn server_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        now.format("%-I:%M:%S %p").to_string()
    }

    /// Time shown in the table after a successful write, e.g. `09:05 AM`.
    pub fn display_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        now.format("%I:%M %p").to_string()
    }

    pub fn server_now() -> String {
        server_time(&Local::now())
    }

    pub fn display_now() -> String {
        display_time(&Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_record_wire_format() {
        let record: AttendanceRecord =
            serde_json::from_str(r#"{"staffId":"1","status":"Present","checkIn":"09:00"}"#).unwrap();
        assert_eq!(record.staff_id, "1");
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.check_in, "09:00");
    }

    #[test]
    fn test_mark_attendance_body() {
        let body = serde_json::to_value(MarkAttendance::present("42", "9:05:03 AM")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"staffId": "42", "status": "Present", "checkIn": "9:05:03 AM"})
        );
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = serde_json::from_str::<AttendanceRecord>(r#"{"staffId":"1","status":"Late","checkIn":"-"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_in_formats() {
        let morning = Utc.with_ymd_and_hms(2025, 11, 25, 9, 5, 3).unwrap();
        assert_eq!(check_in::server_time(&morning), "9:05:03 AM");
        assert_eq!(check_in::display_time(&morning), "09:05 AM");

        let afternoon = Utc.with_ymd_and_hms(2025, 11, 25, 14, 30, 0).unwrap();
        assert_eq!(check_in::server_time(&afternoon), "2:30:00 PM");
        assert_eq!(check_in::display_time(&afternoon), "02:30 PM");
    }
}
