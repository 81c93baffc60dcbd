//! Reqwest-based HTTP client adapter.
//!
//! This module provides the production transport using reqwest,
//! implementing the [`HttpClient`] trait from `crate::traits`.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::StatusCode;

use crate::config::ClientConfig;
use crate::traits::{Headers, HttpClient, HttpError, StreamResponse};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use agent_stream::adapters::ReqwestHttpClient;
/// use agent_stream::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let response = client.open_stream("http://localhost:8000/query/stream", Some("{}"), &Headers::new()).await?;
/// println!("Status: {}", response.status);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client from configuration.
    ///
    /// Only the connect phase is bounded; reads on an open stream never
    /// time out here.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().map_err(Self::convert_error)?;
        Ok(Self { client })
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert reqwest error to HttpError.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert an error raised while reading the body.
    fn convert_read_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Io(err.to_string())
        }
    }

    /// Convert reqwest headers to our Headers type.
    fn convert_headers(headers: &reqwest::header::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn open_stream(
        &self,
        url: &str,
        body: Option<&str>,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        let mut builder = self.client.post(url);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        let status = response.status();
        let response_headers = Self::convert_headers(response.headers());

        if status == StatusCode::NO_CONTENT {
            return Ok(StreamResponse::without_body(status.as_u16()).with_headers(response_headers));
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(Self::convert_read_error));

        Ok(StreamResponse::new(status.as_u16(), Box::pin(stream)).with_headers(response_headers))
    }
}
