//! Attendance view: state machine and async controller.

pub mod controller;
pub mod state;

pub use controller::{AttendanceView, load_rows};
pub use state::{LoadKind, Notice, RenderBranch, RowAction, ViewMessage, ViewState, resolve_row_click};
