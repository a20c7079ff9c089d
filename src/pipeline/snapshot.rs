// src/pipeline/snapshot.rs

//! Daily snapshot pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Config, ResourceType};
use crate::pipeline::diff::{DiffSummary, RecordDiff, calculate_record_diff, unified_diff};
use crate::pipeline::project::{parse_ndjson, project_all, to_ndjson};
use crate::pipeline::render::{render_diff, render_snapshot};
use crate::services::ResourceFetcher;
use crate::storage::{SnapshotStorage, snapshot_name};

/// Diff written for one resource type.
#[derive(Debug, Clone)]
pub struct DiffReport {
    pub path: PathBuf,
    pub previous: NaiveDate,
    pub summary: DiffSummary,
    pub records: RecordDiff,
}

/// Outcome for one resource type.
#[derive(Debug, Clone)]
pub struct TypeReport {
    pub resource_type: ResourceType,
    pub record_count: usize,
    pub snapshot_path: PathBuf,
    pub view_path: Option<PathBuf>,
    /// `None` when there was no snapshot from the previous day
    pub diff: Option<DiffReport>,
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub date: NaiveDate,
    pub types: Vec<TypeReport>,
}

impl RunReport {
    /// Total records written across all types.
    pub fn record_count(&self) -> usize {
        self.types.iter().map(|t| t.record_count).sum()
    }

    /// Number of diff pages written.
    pub fn diff_count(&self) -> usize {
        self.types.iter().filter(|t| t.diff.is_some()).count()
    }
}

/// Run the snapshot for every configured resource type, one after another.
///
/// The first failing step aborts the run.
pub async fn run_snapshot(
    config: &Config,
    fetcher: &ResourceFetcher,
    storage: &dyn SnapshotStorage,
    today: NaiveDate,
) -> Result<RunReport> {
    log::info!(
        "Snapshotting {} resource type(s) from {} for {}",
        config.snapshot.resource_types.len(),
        fetcher.endpoint(),
        today
    );

    let mut types = Vec::with_capacity(config.snapshot.resource_types.len());
    for &resource_type in &config.snapshot.resource_types {
        types.push(snapshot_type(config, fetcher, storage, resource_type, today).await?);
    }

    Ok(RunReport { date: today, types })
}

async fn snapshot_type(
    config: &Config,
    fetcher: &ResourceFetcher,
    storage: &dyn SnapshotStorage,
    resource_type: ResourceType,
    today: NaiveDate,
) -> Result<TypeReport> {
    let resources = fetcher.fetch(resource_type).await?;
    if resources.is_empty() {
        log::warn!("No {resource_type} resources returned, writing an empty snapshot");
    }

    let records = project_all(resource_type, resources);
    let ndjson = to_ndjson(&records)?;
    let snapshot_path = storage.write_snapshot(resource_type, today, &ndjson).await?;
    log::info!(
        "{} {} records written to {}",
        records.len(),
        resource_type,
        snapshot_path.display()
    );

    let view_path = if config.snapshot.render_html {
        let title = format!("{resource_type} ({today})");
        let html = render_snapshot(&title, resource_type, &records);
        let path = storage.write_view(resource_type, today, &html).await?;
        log::info!("View written to {}", path.display());
        Some(path)
    } else {
        None
    };

    let diff = if config.snapshot.diff {
        diff_with_previous(config, storage, resource_type, today, &ndjson, &records).await?
    } else {
        None
    };

    Ok(TypeReport {
        resource_type,
        record_count: records.len(),
        snapshot_path,
        view_path,
        diff,
    })
}

async fn diff_with_previous(
    config: &Config,
    storage: &dyn SnapshotStorage,
    resource_type: ResourceType,
    today: NaiveDate,
    ndjson: &str,
    records: &[serde_json::Map<String, serde_json::Value>],
) -> Result<Option<DiffReport>> {
    let Some(previous) = today.pred_opt() else {
        return Ok(None);
    };
    let Some(previous_text) = storage.load_snapshot(resource_type, previous).await? else {
        log::debug!(
            "No {} snapshot for {}, skipping diff",
            resource_type,
            previous
        );
        return Ok(None);
    };

    let diff = unified_diff(
        &snapshot_name(resource_type, previous),
        &snapshot_name(resource_type, today),
        &previous_text,
        ndjson,
        config.snapshot.diff_context,
    );

    let record_diff = match parse_ndjson(&previous_text) {
        Ok(previous_records) => calculate_record_diff(&previous_records, records),
        Err(e) => {
            log::warn!("Could not parse {resource_type} snapshot for {previous}: {e}");
            RecordDiff::default()
        }
    };

    let title = format!("Diff {resource_type} {previous} to {today}");
    let html = render_diff(&title, &diff.text, diff.summary, &record_diff);
    let path = storage
        .write_diff(resource_type, previous, today, &html)
        .await?;

    if diff.summary.has_changes() {
        log::info!(
            "Diff: {} added, {} updated, {} removed ({} lines +, {} lines -) written to {}",
            record_diff.added.len(),
            record_diff.updated.len(),
            record_diff.removed.len(),
            diff.summary.inserted,
            diff.summary.deleted,
            path.display()
        );
    } else {
        log::info!("No changes since {previous}, diff written to {}", path.display());
    }

    Ok(Some(DiffReport {
        path,
        previous,
        summary: diff.summary,
        records: record_diff,
    }))
}
