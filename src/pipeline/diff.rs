//! Day-over-day diff of snapshot files.
//!
//! Produces the unified line diff that gets rendered for review, plus a
//! record-level summary keyed by canonical URL and version.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use similar::{ChangeTag, TextDiff};

type Record = Map<String, Value>;

/// Line counts of a unified diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub inserted: usize,
    pub deleted: usize,
}

impl DiffSummary {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        self.inserted > 0 || self.deleted > 0
    }
}

/// Unified diff text together with its line counts.
#[derive(Debug, Clone, Default)]
pub struct UnifiedDiff {
    /// Unified-format diff; empty when both sides are identical
    pub text: String,
    pub summary: DiffSummary,
}

/// Compute a unified line diff between two snapshot texts.
pub fn unified_diff(
    old_name: &str,
    new_name: &str,
    old: &str,
    new: &str,
    context: usize,
) -> UnifiedDiff {
    let diff = TextDiff::from_lines(old, new);

    let mut summary = DiffSummary::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => summary.inserted += 1,
            ChangeTag::Delete => summary.deleted += 1,
            ChangeTag::Equal => {}
        }
    }

    let text = diff
        .unified_diff()
        .context_radius(context)
        .header(old_name, new_name)
        .to_string();

    UnifiedDiff { text, summary }
}

/// Record-level changes between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDiff {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl RecordDiff {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty() || !self.removed.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

/// Key identifying a record across days: `url` plus `|version` when present.
///
/// Records without a string `url` have no stable identity and are skipped.
fn record_key(record: &Record) -> Option<String> {
    let url = record.get("url")?.as_str()?;
    match record.get("version").and_then(Value::as_str) {
        Some(version) => Some(format!("{url}|{version}")),
        None => Some(url.to_string()),
    }
}

/// Narrower key for records sharing `key`: appends `#id` when the record has one.
fn id_key(key: &str, record: &Record) -> String {
    match record.get("id").and_then(Value::as_str) {
        Some(id) => format!("{key}#{id}"),
        None => key.to_string(),
    }
}

fn group_by<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    key: impl Fn(&Record) -> Option<String>,
) -> BTreeMap<String, Vec<&'a Record>> {
    let mut groups: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            groups.entry(k).or_default().push(record);
        }
    }
    groups
}

/// Compare the records filed under one key as multisets.
///
/// Records present unchanged on both sides cancel out regardless of order.
/// Leftovers pair up as updates; any surplus is an addition or a removal.
fn compare_group(diff: &mut RecordDiff, key: &str, previous: &[&Record], current: &[&Record]) {
    let mut unmatched: Vec<&Record> = current.to_vec();
    let mut stale = 0;
    for record in previous {
        match unmatched.iter().position(|c| *c == *record) {
            Some(i) => {
                unmatched.swap_remove(i);
            }
            None => stale += 1,
        }
    }
    let fresh = unmatched.len();
    let paired = stale.min(fresh);

    if paired > 0 {
        diff.updated.push(key.to_string());
    }
    if fresh > paired {
        diff.added.push(key.to_string());
    }
    if stale > paired {
        diff.removed.push(key.to_string());
    }
}

/// Calculate record-level changes between yesterday's and today's records.
///
/// When several records share a `url|version` key on either side, they are
/// told apart by `id` and reported as `url|version#id`.
pub fn calculate_record_diff(previous: &[Record], current: &[Record]) -> RecordDiff {
    let prev_groups = group_by(previous, record_key);
    let curr_groups = group_by(current, record_key);
    let keys: BTreeSet<&String> = prev_groups.keys().chain(curr_groups.keys()).collect();

    let mut diff = RecordDiff::default();
    for key in keys {
        let prev = prev_groups.get(key).map(Vec::as_slice).unwrap_or_default();
        let curr = curr_groups.get(key).map(Vec::as_slice).unwrap_or_default();

        if prev.len() <= 1 && curr.len() <= 1 {
            compare_group(&mut diff, key, prev, curr);
            continue;
        }

        let prev_by_id = group_by(prev.iter().copied(), |r| Some(id_key(key, r)));
        let curr_by_id = group_by(curr.iter().copied(), |r| Some(id_key(key, r)));
        let sub_keys: BTreeSet<&String> = prev_by_id.keys().chain(curr_by_id.keys()).collect();
        for sub_key in sub_keys {
            compare_group(
                &mut diff,
                sub_key,
                prev_by_id.get(sub_key).map(Vec::as_slice).unwrap_or_default(),
                curr_by_id.get(sub_key).map(Vec::as_slice).unwrap_or_default(),
            );
        }
    }
    diff
}
