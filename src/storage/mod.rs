//! Storage abstractions for snapshot persistence.
//!
//! ## Directory Structure
//!
//! ```text
//! {out_dir}/
//! ├── CodeSystem-2026-01-01.ndjson
//! ├── CodeSystem-2026-01-02.ndjson
//! ├── CodeSystem-2026-01-02.ndjson.html
//! ├── Diff-CodeSystem-2026-01-01-2026-01-02.html
//! └── ...
//! ```

pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::ResourceType;

// Re-export for convenience
pub use local::LocalStorage;

/// Snapshot file name, e.g. `ValueSet-2026-01-02.ndjson`.
pub fn snapshot_name(resource_type: ResourceType, date: NaiveDate) -> String {
    format!("{}-{}.ndjson", resource_type, date.format("%Y-%m-%d"))
}

/// HTML view name for a snapshot, e.g. `ValueSet-2026-01-02.ndjson.html`.
pub fn view_name(resource_type: ResourceType, date: NaiveDate) -> String {
    format!("{}.html", snapshot_name(resource_type, date))
}

/// Diff page name, e.g. `Diff-ValueSet-2026-01-01-2026-01-02.html`.
pub fn diff_name(resource_type: ResourceType, previous: NaiveDate, current: NaiveDate) -> String {
    format!(
        "Diff-{}-{}-{}.html",
        resource_type,
        previous.format("%Y-%m-%d"),
        current.format("%Y-%m-%d")
    )
}

/// Trait for snapshot storage backends.
///
/// Writes replace any existing artifact of the same name.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Write the ndjson snapshot for a type and day.
    async fn write_snapshot(
        &self,
        resource_type: ResourceType,
        date: NaiveDate,
        ndjson: &str,
    ) -> Result<PathBuf>;

    /// Load a snapshot, or `None` if there is none for that day.
    async fn load_snapshot(
        &self,
        resource_type: ResourceType,
        date: NaiveDate,
    ) -> Result<Option<String>>;

    /// Write the HTML view of a snapshot.
    async fn write_view(
        &self,
        resource_type: ResourceType,
        date: NaiveDate,
        html: &str,
    ) -> Result<PathBuf>;

    /// Write the HTML diff page between two days.
    async fn write_diff(
        &self,
        resource_type: ResourceType,
        previous: NaiveDate,
        current: NaiveDate,
        html: &str,
    ) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn test_names() {
        assert_eq!(
            snapshot_name(ResourceType::CodeSystem, day(2)),
            "CodeSystem-2026-01-02.ndjson"
        );
        assert_eq!(
            view_name(ResourceType::ValueSet, day(2)),
            "ValueSet-2026-01-02.ndjson.html"
        );
        assert_eq!(
            diff_name(ResourceType::ConceptMap, day(1), day(2)),
            "Diff-ConceptMap-2026-01-01-2026-01-02.html"
        );
    }
}
