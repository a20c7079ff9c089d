// src/services/fetcher.rs

//! Resource metadata fetcher.
//!
//! Issues the projected search for one resource type and returns the raw
//! resources from the result bundle.

use std::collections::HashSet;

use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{Bundle, ClientConfig, ResourceType};
use crate::utils::url::search_url;

/// Service for fetching resource metadata from a FHIR endpoint.
pub struct ResourceFetcher {
    client: Client,
    endpoint: String,
    page_size: u32,
    follow_next: bool,
}

impl ResourceFetcher {
    /// Create a fetcher for `endpoint` (already normalized, no trailing slash).
    pub fn new(client: Client, endpoint: impl Into<String>, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            page_size: config.page_size,
            follow_next: config.follow_next,
        }
    }

    /// Endpoint the fetcher queries.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch all resources of `resource_type` in bundle order.
    ///
    /// Reads only the first page unless `follow_next` is enabled.
    pub async fn fetch(&self, resource_type: ResourceType) -> Result<Vec<Value>> {
        let mut next = Some(search_url(&self.endpoint, resource_type, self.page_size));
        let mut visited = HashSet::new();
        let mut resources = Vec::new();

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                log::warn!("Paging loop detected at {url}, stopping");
                break;
            }

            log::info!("Requesting {url}");
            let bundle = self.fetch_page(&url).await?;

            if self.follow_next {
                next = bundle.next_link().map(str::to_string);
            } else if let Some(link) = bundle.next_link() {
                log::debug!("Ignoring next page {link}");
            }

            let page = bundle.into_resources();
            log::debug!("Page returned {} {} resources", page.len(), resource_type);
            resources.extend(page);
        }

        Ok(resources)
    }

    async fn fetch_page(&self, url: &str) -> Result<Bundle> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(url, status));
        }
        let body = response.bytes().await?;
        Bundle::parse(url, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::utils::http::create_client;

    fn fetcher(server: &MockServer, config: &ClientConfig) -> ResourceFetcher {
        let client = create_client(config).unwrap();
        ResourceFetcher::new(client, format!("{}/fhir", server.uri()), config)
    }

    fn bundle(urls: &[&str], next: Option<String>) -> serde_json::Value {
        let entry: Vec<_> = urls
            .iter()
            .map(|u| json!({"resource": {"resourceType": "ValueSet", "url": u}}))
            .collect();
        let link: Vec<_> = next
            .into_iter()
            .map(|url| json!({"relation": "next", "url": url}))
            .collect();
        json!({"resourceType": "Bundle", "type": "searchset", "link": link, "entry": entry})
    }

    #[tokio::test]
    async fn test_fetch_sends_projection_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhir/ValueSet"))
            .and(query_param("_elements", "url,version,id,name,title,status"))
            .and(query_param("_count", "1000"))
            .and(query_param("_format", "json"))
            .and(header("accept", "application/fhir+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["b", "a"], None)))
            .expect(1)
            .mount(&server)
            .await;

        let resources = fetcher(&server, &ClientConfig::default())
            .fetch(ResourceType::ValueSet)
            .await
            .unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0]["url"], "b");
    }

    #[tokio::test]
    async fn test_fetch_sends_configured_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fhir/CodeSystem"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["a"], None)))
            .mount(&server)
            .await;

        let config = ClientConfig {
            headers: vec!["Authorization: Bearer secret".to_string()],
            ..ClientConfig::default()
        };
        let resources = fetcher(&server, &config)
            .fetch(ResourceType::CodeSystem)
            .await
            .unwrap();
        assert_eq!(resources.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = fetcher(&server, &ClientConfig::default())
            .fetch(ResourceType::ConceptMap)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_first_page_only_by_default() {
        let server = MockServer::start().await;
        let next = format!("{}/fhir/next-page", server.uri());
        Mock::given(method("GET"))
            .and(path("/fhir/ValueSet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["a"], Some(next))))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fhir/next-page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["b"], None)))
            .expect(0)
            .mount(&server)
            .await;

        let resources = fetcher(&server, &ClientConfig::default())
            .fetch(ResourceType::ValueSet)
            .await
            .unwrap();
        assert_eq!(resources.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_follows_next_when_enabled() {
        let server = MockServer::start().await;
        let next = format!("{}/fhir/next-page", server.uri());
        Mock::given(method("GET"))
            .and(path("/fhir/ValueSet"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["a"], Some(next))))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fhir/next-page"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["b", "c"], None)))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            follow_next: true,
            ..ClientConfig::default()
        };
        let resources = fetcher(&server, &config)
            .fetch(ResourceType::ValueSet)
            .await
            .unwrap();
        assert_eq!(resources.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_stops_on_paging_loop() {
        let server = MockServer::start().await;
        let next = format!("{}/fhir/loop", server.uri());
        Mock::given(method("GET"))
            .and(path("/fhir/ValueSet"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(bundle(&["a"], Some(next.clone()))),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fhir/loop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(bundle(&["b"], Some(next))))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig {
            follow_next: true,
            ..ClientConfig::default()
        };
        let resources = fetcher(&server, &config)
            .fetch(ResourceType::ValueSet)
            .await
            .unwrap();
        assert_eq!(resources.len(), 2);
    }
}
