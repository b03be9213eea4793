//! API Client
//!
//! Builds JSON requests against the Vipps base URL, dispatches them through
//! the authenticated transport stack and classifies the outcome.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::core::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::error::{DecodeError, HttpError, RequestError, VippsError, VippsResult};
use crate::telemetry::{LogArgument, LogContext, Logger};

const MSG_EXECUTE_FAILED: &str = "error executing Vipps HTTP request";
const MSG_EXECUTED: &str = "executed Vipps HTTP request";
const MSG_DECODE_FAILED: &str = "error unmarshalling body";

/// Transport facade shared by the API surfaces.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    logger: Arc<dyn Logger>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            logger,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `segments` under the base URL. Each segment is percent-encoded
    /// as a single path segment, so ids cannot add segments, a query or a
    /// fragment.
    pub fn endpoint(&self, segments: &[&str]) -> VippsResult<url::Url> {
        let invalid = |message: String| {
            VippsError::Request(RequestError::InvalidEndpoint {
                endpoint: segments.join("/"),
                message,
            })
        };

        let mut url = url::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request for `endpoint`, a path relative to the base URL or an
    /// absolute `http(s)` URL. `body`, when given, is sent as JSON.
    ///
    /// `Content-Type: application/json` is set even without a body.
    pub fn new_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&B>,
    ) -> VippsResult<HttpRequest> {
        let url = self.resolve(endpoint)?;
        let mut request = HttpRequest::new(method, url);

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(|e| {
                VippsError::Request(RequestError::InvalidBody {
                    message: e.to_string(),
                })
            })?;
            request.body = Some(Bytes::from(encoded));
        }

        request.set_header("content-type", "application/json")?;
        Ok(request)
    }

    /// [`new_request`](Self::new_request) without a body.
    pub fn new_empty_request(&self, method: HttpMethod, endpoint: &str) -> VippsResult<HttpRequest> {
        self.new_request::<()>(method, endpoint, None)
    }

    fn resolve(&self, endpoint: &str) -> VippsResult<String> {
        let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        };

        url::Url::parse(&url).map_err(|e| {
            VippsError::Request(RequestError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(url)
    }

    /// Dispatch `request` and decode a successful JSON response into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> VippsResult<T> {
        let (context, arguments) = Self::log_fields(&request);
        let response = self.dispatch(request, &context, &arguments).await?;

        serde_json::from_slice(&response.body).map_err(|e| {
            self.logger.error(
                &context,
                MSG_DECODE_FAILED,
                &[arguments.as_slice(), &[LogArgument::new("error", &e)]].concat(),
            );
            VippsError::Decode(DecodeError {
                message: e.to_string(),
            })
        })
    }

    /// Dispatch `request`, ignoring the body of a successful response.
    pub async fn execute_no_content(&self, request: HttpRequest) -> VippsResult<()> {
        let (context, arguments) = Self::log_fields(&request);
        self.dispatch(request, &context, &arguments).await.map(|_| ())
    }

    fn log_fields(request: &HttpRequest) -> (LogContext, Vec<LogArgument>) {
        let context = LogContext::new().request_id(Uuid::new_v4().to_string());
        let arguments = vec![
            LogArgument::new("method", request.method),
            LogArgument::new("url", &request.url),
        ];
        (context, arguments)
    }

    async fn dispatch(
        &self,
        request: HttpRequest,
        context: &LogContext,
        arguments: &[LogArgument],
    ) -> VippsResult<HttpResponse> {
        let start = Instant::now();
        let result = self.transport.send(request).await;
        let duration = LogArgument::new("durationMS", start.elapsed().as_millis());
        let arguments = [arguments, &[duration]].concat();

        let response = match result {
            Ok(response) => {
                self.logger.info(context, MSG_EXECUTED, &arguments);
                response
            }
            Err(error) => {
                self.logger.error(context, MSG_EXECUTE_FAILED, &arguments);
                return Err(error);
            }
        };

        if !response.is_success() {
            return Err(VippsError::Http(HttpError {
                body: response.body,
                status: response.status,
            }));
        }

        Ok(response)
    }
}
