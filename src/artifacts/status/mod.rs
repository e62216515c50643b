//! Working tree status report
//!
//! - `file_change`: kinds of unstaged modification
//! - `status_info`: the five-section report and its rendering

pub mod file_change;
pub mod status_info;
