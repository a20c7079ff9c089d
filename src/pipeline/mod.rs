//! Pipeline entry points for snapshot operations.
//!
//! - `project`: sort and restrict fetched resources to their field list
//! - `diff`: unified and record-level diffs between two days
//! - `render`: HTML views of snapshots and diffs
//! - `run_snapshot`: the daily run tying these together

pub mod diff;
pub mod project;
pub mod render;
pub mod snapshot;

pub use snapshot::{DiffReport, RunReport, TypeReport, run_snapshot};
