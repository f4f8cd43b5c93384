pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;
pub mod view;

pub use error::{AppError, Result};
