//! HTTP Transport
//!
//! HTTP client interface and implementations. Every layer of the request
//! pipeline (header injection, bearer auth, the base network client) is an
//! [`HttpTransport`], so layers compose by wrapping one another.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::{ConfigurationError, NetworkError, RequestError, VippsError, VippsResult};

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Bytes>,
    /// Request timeout.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Path component of the URL, or `None` if the URL does not parse.
    pub fn path(&self) -> Option<String> {
        url::Url::parse(&self.url).ok().map(|u| u.path().to_string())
    }

    /// Set a header, replacing any existing values for `name`.
    pub fn set_header(&mut self, name: &str, value: &str) -> VippsResult<()> {
        let invalid = || {
            VippsError::Request(RequestError::InvalidHeader {
                name: name.to_string(),
            })
        };
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let mut value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        if is_sensitive(&name) {
            value.set_sensitive(true);
        }
        self.headers.insert(name, value);
        Ok(())
    }

    /// First value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

fn is_sensitive(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "authorization" | "client_secret" | "ocp-apim-subscription-key"
    )
}

/// HTTP response definition. The body is always fully read.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Response with a JSON-serialized body.
    pub fn json<T: serde::Serialize>(status: u16, body: &T) -> Self {
        let mut response = Self::new(status, serde_json::to_vec(body).unwrap_or_default());
        response.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response
    }

    /// Whether the status is within `200..=299`.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> VippsResult<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn send(&self, request: HttpRequest) -> VippsResult<HttpResponse> {
        (**self).send(request).await
    }
}

/// Default reqwest-based HTTP transport.
///
/// Redirects are not followed; a 3xx is returned to the caller like any other
/// status. Without a default timeout, only requests carrying their own
/// [`HttpRequest::timeout`] are bounded.
#[derive(Clone, Debug)]
pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    default_timeout: Option<Duration>,
}

impl ReqwestHttpTransport {
    /// Create new transport with no default timeout.
    pub fn new() -> VippsResult<Self> {
        Self::build(None)
    }

    /// Create transport bounding every request by `timeout`.
    pub fn with_timeout(timeout: Duration) -> VippsResult<Self> {
        Self::build(Some(timeout))
    }

    fn build(default_timeout: Option<Duration>) -> VippsResult<Self> {
        let mut builder =
            reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = default_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| {
            VippsError::Configuration(ConfigurationError::HttpClient {
                message: e.to_string(),
            })
        })?;

        Ok(Self {
            client,
            default_timeout,
        })
    }

    /// Create transport around a pre-built client.
    pub fn with_client(client: reqwest::Client, default_timeout: Option<Duration>) -> Self {
        Self {
            client,
            default_timeout,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> VippsResult<HttpResponse> {
        let timeout = request.timeout.or(self.default_timeout);

        let mut req_builder = self
            .client
            .request(request.method.to_reqwest(), &request.url)
            .headers(request.headers);

        if let Some(timeout) = timeout {
            req_builder = req_builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                VippsError::Network(NetworkError::Timeout { timeout })
            } else if e.is_connect() {
                VippsError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            } else {
                VippsError::Network(NetworkError::Other {
                    message: e.to_string(),
                })
            }
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                VippsError::Network(NetworkError::Timeout { timeout })
            } else {
                VippsError::Network(NetworkError::BodyRead {
                    message: e.to_string(),
                })
            }
        })?;

        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            status,
            body_len = body.len(),
            "Received response"
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

type Responder = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

enum MockReply {
    Response(HttpResponse),
    ConnectionFailed(String),
}

/// Mock HTTP transport for testing.
///
/// Replies are chosen in order: a route whose path matches the request, then
/// the queue (first in, first out), then the default response. With none of
/// those the request fails with a connection error.
#[derive(Default)]
pub struct MockHttpTransport {
    routes: Mutex<Vec<(String, Responder)>>,
    queue: Mutex<VecDeque<MockReply>>,
    default_response: Mutex<Option<HttpResponse>>,
    request_history: Mutex<Vec<HttpRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpTransport {
    /// Create new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer requests to `path` with `response`.
    pub fn route(&self, path: impl Into<String>, response: HttpResponse) -> &Self {
        self.route_with(path, move |_| response.clone())
    }

    /// Answer requests to `path` by calling `responder`.
    pub fn route_with<F>(&self, path: impl Into<String>, responder: F) -> &Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        lock(&self.routes).push((path.into(), Arc::new(responder)));
        self
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        lock(&self.queue).push_back(MockReply::Response(response));
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        self.queue_response(HttpResponse::json(status, body))
    }

    /// Queue a network failure.
    pub fn queue_connection_failure(&self, message: impl Into<String>) -> &Self {
        lock(&self.queue).push_back(MockReply::ConnectionFailed(message.into()));
        self
    }

    /// Set default response when nothing else matches.
    pub fn set_default_response(&self, response: HttpResponse) -> &Self {
        *lock(&self.default_response) = Some(response);
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.request_history).clone()
    }

    /// Requests whose URL path equals `path`.
    pub fn get_requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.get_requests()
            .into_iter()
            .filter(|r| r.path().as_deref() == Some(path))
            .collect()
    }

    /// Get last request.
    pub fn get_last_request(&self) -> Option<HttpRequest> {
        lock(&self.request_history).last().cloned()
    }

    /// Clear request history.
    pub fn clear_history(&self) {
        lock(&self.request_history).clear();
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> VippsResult<HttpResponse> {
        lock(&self.request_history).push(request.clone());

        let path = request.path();
        let routed = lock(&self.routes)
            .iter()
            .find(|(p, _)| path.as_deref() == Some(p.as_str()))
            .map(|(_, responder)| responder.clone());
        if let Some(responder) = routed {
            return Ok(responder(&request));
        }

        let reply = lock(&self.queue)
            .pop_front()
            .or_else(|| lock(&self.default_response).clone().map(MockReply::Response));

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::ConnectionFailed(message)) => {
                Err(VippsError::Network(NetworkError::ConnectionFailed { message }))
            }
            None => Err(VippsError::Network(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_queue_is_fifo() {
        let transport = MockHttpTransport::new();
        transport.queue_json_response(200, &serde_json::json!({"n": 1}));
        transport.queue_json_response(201, &serde_json::json!({"n": 2}));

        let request = HttpRequest::new(HttpMethod::Get, "https://example.com/a");
        let first = transport.send(request.clone()).await.unwrap();
        let second = transport.send(request).await.unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(second.status, 201);

        let history = transport.get_requests();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_mock_transport_routes_by_path() {
        let transport = MockHttpTransport::new();
        transport.route("/token", HttpResponse::new(200, "token"));
        transport.queue_response(HttpResponse::new(204, ""));

        let routed = transport
            .send(HttpRequest::new(HttpMethod::Post, "https://example.com/token"))
            .await
            .unwrap();
        assert_eq!(&routed.body[..], b"token");

        let queued = transport
            .send(HttpRequest::new(HttpMethod::Get, "https://example.com/other"))
            .await
            .unwrap();
        assert_eq!(queued.status, 204);
        assert_eq!(transport.get_requests_to("/token").len(), 1);
    }

    #[tokio::test]
    async fn test_mock_transport_without_reply_fails() {
        let transport = MockHttpTransport::new();
        transport.queue_connection_failure("reset by peer");

        let request = HttpRequest::new(HttpMethod::Get, "https://example.com");
        let result = transport.send(request.clone()).await;
        assert!(matches!(
            result,
            Err(VippsError::Network(NetworkError::ConnectionFailed { .. }))
        ));
        assert!(transport.send(request).await.is_err());
    }

    #[test]
    fn test_set_header_replaces_existing_value() {
        let mut request = HttpRequest::new(HttpMethod::Get, "https://example.com/x?y=1");
        request.set_header("X-Test", "one").unwrap();
        request.set_header("x-test", "two").unwrap();

        assert_eq!(request.headers.get_all("x-test").iter().count(), 1);
        assert_eq!(request.header("X-Test"), Some("two"));
        assert_eq!(request.path().as_deref(), Some("/x"));
        assert!(request.set_header("bad header", "v").is_err());
    }

    #[test]
    fn test_default_transport_sets_no_request_timeout() {
        let transport = ReqwestHttpTransport::new().unwrap();
        assert_eq!(transport.default_timeout, None);

        let transport = ReqwestHttpTransport::with_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(transport.default_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_status_classification() {
        for status in [200, 201, 299] {
            assert!(HttpResponse::new(status, "").is_success());
        }
        for status in [199, 300, 400, 404, 500] {
            assert!(!HttpResponse::new(status, "").is_success());
        }
    }
}
