//! UI layer for the desktop calculator: the app shell and its theme.

pub mod app;
pub mod theme;

pub use app::{HmpiCalculatorApp, StartupConfig};
