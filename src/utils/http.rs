// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderValue};

use crate::error::Result;
use crate::models::ClientConfig;

/// Media type requested from the server.
pub const FHIR_JSON: &str = "application/fhir+json";

/// Create a configured asynchronous HTTP client.
///
/// Configured extra headers and `Accept: application/fhir+json` are sent
/// with every request.
pub fn create_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = config.header_map()?;
    headers
        .entry(ACCEPT)
        .or_insert(HeaderValue::from_static(FHIR_JSON));

    let mut builder = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    Ok(builder.build()?)
}
