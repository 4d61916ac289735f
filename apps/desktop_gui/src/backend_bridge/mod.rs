//! Backend bridge: commands from the UI thread and the worker that runs them.

pub mod commands;
pub mod runtime;
