//! GUI windows and application state.

pub mod add_staff_modal;
pub mod app;
pub mod components;
pub mod qr_modal;
pub mod staff_table;

pub use app::App;
