//! Transport Middleware
//!
//! [`HttpTransport`] decorators that add Vipps authentication to outgoing
//! requests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ConfigurationError, VippsError, VippsResult};
use crate::token::TokenManager;
use crate::types::Credentials;

/// Header carrying the API gateway subscription key.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const CLIENT_ID_HEADER: &str = "client_id";
pub const CLIENT_SECRET_HEADER: &str = "client_secret";

/// Adds the subscription key to every request, and the client credentials to
/// requests for the access token endpoint.
///
/// The token endpoint is recognised by URL path alone. Headers the caller
/// already set are kept, except those written here which are replaced.
pub struct AuthenticatingTransport<T: HttpTransport> {
    inner: T,
    credentials: Credentials,
    token_path: String,
}

impl<T: HttpTransport> AuthenticatingTransport<T> {
    /// Wrap `inner`. `token_url` must be an absolute URL.
    pub fn new(inner: T, credentials: Credentials, token_url: &str) -> VippsResult<Self> {
        let token_path = url::Url::parse(token_url)
            .map_err(|e| {
                VippsError::Configuration(ConfigurationError::InvalidUrl {
                    url: token_url.to_string(),
                    message: e.to_string(),
                })
            })?
            .path()
            .to_string();

        Ok(Self {
            inner,
            credentials,
            token_path,
        })
    }

    fn is_token_request(&self, request: &HttpRequest) -> bool {
        request.path().as_deref() == Some(self.token_path.as_str())
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for AuthenticatingTransport<T> {
    async fn send(&self, mut request: HttpRequest) -> VippsResult<HttpResponse> {
        if self.is_token_request(&request) {
            request.set_header(CLIENT_ID_HEADER, &self.credentials.client_id)?;
            request.set_header(CLIENT_SECRET_HEADER, self.credentials.expose_client_secret())?;
        }
        request.set_header(
            SUBSCRIPTION_KEY_HEADER,
            self.credentials.expose_subscription_key(),
        )?;

        self.inner.send(request).await
    }
}

/// Attaches `Authorization: Bearer <token>` from a [`TokenManager`].
///
/// A request is never sent without a token: if none can be obtained the call
/// fails with the token error.
pub struct BearerTransport<T: HttpTransport, M: TokenManager + ?Sized> {
    inner: T,
    tokens: Arc<M>,
}

impl<T: HttpTransport, M: TokenManager + ?Sized> BearerTransport<T, M> {
    pub fn new(inner: T, tokens: Arc<M>) -> Self {
        Self { inner, tokens }
    }
}

#[async_trait]
impl<T: HttpTransport, M: TokenManager + ?Sized> HttpTransport for BearerTransport<T, M> {
    async fn send(&self, mut request: HttpRequest) -> VippsResult<HttpResponse> {
        let token = self.tokens.get_access_token().await?;
        request.set_header("authorization", &token.authorization_header())?;
        self.inner.send(request).await
    }
}
