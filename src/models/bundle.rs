//! FHIR search-set bundle, reduced to the parts the snapshot reads.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};

/// A search result bundle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bundle {
    #[serde(rename = "resourceType", default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub link: Vec<BundleLink>,

    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

/// A paging link (`self`, `next`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// A single search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleEntry {
    #[serde(default)]
    pub resource: Option<Value>,
}

impl Bundle {
    /// Parse a response body fetched from `url`.
    pub fn parse(url: &str, body: &[u8]) -> Result<Self> {
        let bundle: Bundle =
            serde_json::from_slice(body).map_err(|e| AppError::bundle(url, e))?;

        match bundle.resource_type.as_deref() {
            None | Some("Bundle") => Ok(bundle),
            Some(other) => Err(AppError::bundle(
                url,
                format!("expected resourceType Bundle, got {other}"),
            )),
        }
    }

    /// URL of the next page, if the server reported one.
    pub fn next_link(&self) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == "next")
            .map(|l| l.url.as_str())
    }

    /// Resources in bundle order. Entries without a resource are dropped.
    pub fn into_resources(self) -> Vec<Value> {
        self.entry.into_iter().filter_map(|e| e.resource).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_in_order() {
        let body = br#"{
            "resourceType": "Bundle",
            "type": "searchset",
            "entry": [
                {"resource": {"resourceType": "ValueSet", "url": "b"}},
                {"fullUrl": "http://x/ValueSet/2"},
                {"resource": {"resourceType": "ValueSet", "url": "a"}}
            ]
        }"#;
        let resources = Bundle::parse("http://x", body).unwrap().into_resources();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0]["url"], "b");
        assert_eq!(resources[1]["url"], "a");
    }

    #[test]
    fn test_missing_entry_is_empty() {
        let body = br#"{"resourceType": "Bundle", "total": 0}"#;
        let bundle = Bundle::parse("http://x", body).unwrap();
        assert!(bundle.next_link().is_none());
        assert!(bundle.into_resources().is_empty());
    }

    #[test]
    fn test_next_link() {
        let body = br#"{
            "resourceType": "Bundle",
            "link": [
                {"relation": "self", "url": "http://x/ValueSet?page=1"},
                {"relation": "next", "url": "http://x/ValueSet?page=2"}
            ]
        }"#;
        let bundle = Bundle::parse("http://x", body).unwrap();
        assert_eq!(bundle.next_link(), Some("http://x/ValueSet?page=2"));
    }

    #[test]
    fn test_rejects_operation_outcome() {
        let body = br#"{"resourceType": "OperationOutcome", "issue": []}"#;
        let err = Bundle::parse("http://x", body).unwrap_err();
        assert!(matches!(err, AppError::Bundle { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(Bundle::parse("http://x", b"<html>").is_err());
    }
}
