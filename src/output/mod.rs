//! Report rendering and saving

pub mod formatter;

pub use formatter::{OutputFormatter, ReportGenerator};
