//! Data models for staff, attendance records, and joined display rows.

pub mod attendance;
pub mod row;
pub mod staff;

pub use attendance::{AttendanceRecord, AttendanceStatus, MarkAttendance, check_in};
pub use row::{DisplayRow, merge_attendance};
pub use staff::{CreateStaff, StaffMember};
