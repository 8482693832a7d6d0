//! Output formatting for query records

pub mod console;
pub mod formatter;
