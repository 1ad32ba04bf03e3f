//! Output formatting for session reports

pub mod console;
pub mod formatter;
