// wingtable library root.
// Timetable widgets over the schedule cache the application shell keeps in a shared store.

pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod logging;
pub mod schedule;
pub mod store;
pub mod ui;
pub mod widget;

pub use error::{Result, WidgetError};
