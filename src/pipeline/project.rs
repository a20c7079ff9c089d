//! Sorting and field projection of fetched resources.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::models::ResourceType;

/// Canonical URL of a resource, if it has a string `url`.
fn canonical_url(resource: &Value) -> Option<&str> {
    resource.get("url").and_then(Value::as_str)
}

/// Stable ascending sort by `url`.
///
/// Resources without a string `url` sort first and keep their relative order.
pub fn sort_by_url(resources: &mut [Value]) {
    resources.sort_by(|a, b| match (canonical_url(a), canonical_url(b)) {
        (Some(x), Some(y)) => x.cmp(y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Restrict a resource to `fields`, in `fields` order.
///
/// Absent and `null` fields are omitted.
pub fn project(resource: &Value, fields: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    for &field in fields {
        match resource.get(field) {
            None | Some(Value::Null) => {}
            Some(value) => {
                out.insert(field.to_string(), value.clone());
            }
        }
    }
    out
}

/// Sort and project resources into records for `resource_type`.
pub fn project_all(
    resource_type: ResourceType,
    mut resources: Vec<Value>,
) -> Vec<Map<String, Value>> {
    sort_by_url(&mut resources);
    resources
        .iter()
        .map(|r| project(r, resource_type.fields()))
        .collect()
}

/// Serialize records as newline-delimited JSON.
pub fn to_ndjson(records: &[Map<String, Value>]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Parse newline-delimited JSON records, skipping blank lines.
pub fn parse_ndjson(text: &str) -> Result<Vec<Map<String, Value>>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(AppError::from))
        .collect()
}
