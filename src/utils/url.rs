// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::{AppError, Result};
use crate::models::ResourceType;

/// Validate a server endpoint and strip trailing slashes.
///
/// # Examples
/// ```
/// use termsnap::utils::url::normalize_endpoint;
///
/// assert_eq!(
///     normalize_endpoint("https://tx.example.org/fhir/").unwrap(),
///     "https://tx.example.org/fhir"
/// );
/// ```
pub fn normalize_endpoint(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw.trim())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::validation(format!(
            "endpoint must be an http(s) URL, got scheme '{}'",
            parsed.scheme()
        )));
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

/// Build the search URL for one resource type.
///
/// The field list is left unencoded so the query reads
/// `_elements=url,version,...` on the wire.
pub fn search_url(endpoint: &str, resource_type: ResourceType, page_size: u32) -> String {
    format!(
        "{}/{}?_elements={}&_count={}&_format=json",
        endpoint.trim_end_matches('/'),
        resource_type,
        resource_type.elements(),
        page_size
    )
}
