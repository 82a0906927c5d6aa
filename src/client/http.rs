//! HTTP record source backed by reqwest
//!
//! Issues a GET on the resource's JSON endpoint with the
//! `X-Requested-With: XMLHttpRequest` header the console views expect for
//! JSON requests, then normalises the response:
//!
//! - 2xx: body decoded as a [`ListPayload`] (missing `results` is empty)
//! - 403: [`FetchError::SessionExpired`] with the `error`/`message` text
//! - other: [`FetchError::Http`]
//! - no response at all: [`FetchError::Transport`]

use crate::config::ResourceConfig;
use crate::core::error::FetchError;
use crate::core::record::ListPayload;
use crate::core::service::RecordSource;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Header marking the request as an in-page JSON call
pub const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// [`RecordSource`] fetching a JSON endpoint over HTTP
#[derive(Clone)]
pub struct HttpRecordSource {
    client: Client,
    url: String,
}

impl HttpRecordSource {
    /// Create a source for an absolute endpoint URL
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Create a source for a configured resource relative to `base_url`
    pub fn for_resource(client: Client, base_url: &str, resource: &ResourceConfig) -> Self {
        let url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            resource.endpoint.trim_start_matches('/')
        );
        Self::new(client, url)
    }

    /// A client with a request timeout, suitable for polling
    pub fn default_client(timeout: Duration) -> Result<Client, FetchError> {
        Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self) -> Result<ListPayload, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(REQUESTED_WITH.0, REQUESTED_WITH.1)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| FetchError::Transport {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let body: Option<Value> = serde_json::from_slice(&bytes).ok();
            return Err(FetchError::from_status(status.as_u16(), body.as_ref()));
        }

        if bytes.is_empty() {
            return Ok(ListPayload::default());
        }
        let body: Value = serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode {
            message: e.to_string(),
        })?;
        ListPayload::from_json(body).map_err(|e| FetchError::Decode {
            message: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_resource_joins_url() {
        let resource = ResourceConfig::new("volumes", "/volumes/json");
        let source =
            HttpRecordSource::for_resource(Client::new(), "https://console.example.com/", &resource);
        assert_eq!(source.url(), "https://console.example.com/volumes/json");
        assert_eq!(source.describe(), source.url());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = HttpRecordSource::default_client(Duration::from_millis(200)).unwrap();
        let source = HttpRecordSource::new(client, "http://127.0.0.1:9/volumes/json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
