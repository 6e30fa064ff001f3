//! HTTP client utilities for TurboCommerce.
//!
//! Provides a small builder API for JSON requests against the storefront
//! backend. Requests are executed by an [`HttpTransport`]; the default one
//! is backed by `reqwest`.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_data::FetchClient;
//!
//! let client = FetchClient::new()?.with_base_url("https://shop.example.com/api");
//!
//! let body: serde_json::Value = client
//!     .post("/catalog/products/get-variation-by-attribute")
//!     .json(&serde_json::json!({"product_id": 12, "attributes": {"1": 3}}))?
//!     .send()
//!     .await?
//!     .json()?;
//! ```

mod error;
mod request;
mod response;
mod transport;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use transport::{HttpTransport, ReqwestTransport, DEFAULT_TIMEOUT};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for making outbound requests.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl FetchClient {
    /// Create a client using `reqwest` with the default timeout.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client using `reqwest` with an explicit timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self::with_transport(Arc::new(ReqwestTransport::new(timeout)?)))
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Set a base URL that will be prepended to relative request paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    url.trim_start_matches('/')
                )
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url).accept("application/json");
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            transport: Arc::clone(&self.transport),
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    transport: Arc<dyn HttpTransport>,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        self.builder = self.builder.bearer_auth(token);
        self
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        let method = self.builder.method.as_str();
        let url = self.builder.url.clone();
        tracing::debug!(method, url = %url, "sending request");

        let response = self.transport.execute(self.builder).await;
        match &response {
            Ok(resp) => tracing::debug!(method, url = %url, status = resp.status, "response received"),
            Err(e) => tracing::debug!(method, url = %url, error = %e, "request failed"),
        }
        response
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpTransport, Method, Response};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        seen: Mutex<Vec<RequestBuilder>>,
    }

    #[async_trait]
    impl HttpTransport for RecordingTransport {
        async fn execute(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            self.seen.lock().unwrap().push(request);
            Ok(Response::from_json(200, &serde_json::json!({"ok": true})))
        }
    }

    #[tokio::test]
    async fn test_base_url_joins_relative_paths() {
        let transport = Arc::new(RecordingTransport::default());
        let client = FetchClient::with_transport(transport.clone())
            .with_base_url("https://shop.test/api/");

        client.get("/marketplace/cart").send().await.unwrap();
        client.get("https://other.test/x").send().await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url(), "https://shop.test/api/marketplace/cart");
        assert_eq!(seen[1].url(), "https://other.test/x");
    }

    #[tokio::test]
    async fn test_default_headers_and_auth() {
        let transport = Arc::new(RecordingTransport::default());
        let client = FetchClient::with_transport(transport.clone())
            .with_default_header("X-Locale", "en");

        let resp = client
            .post("https://shop.test/x")
            .bearer_auth("tok")
            .json(&serde_json::json!({"a": 1}))
            .unwrap()
            .send()
            .await
            .unwrap();
        assert!(resp.is_success());

        let seen = transport.seen.lock().unwrap();
        let req = &seen[0];
        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.header_value("x-locale"), Some("en"));
        assert_eq!(req.header_value("authorization"), Some("Bearer tok"));
        assert_eq!(req.header_value("accept"), Some("application/json"));
        assert_eq!(req.body_json().unwrap()["a"], 1);
    }
}
