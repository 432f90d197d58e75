use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AuthError;
use crate::models::{ErrorEnvelope, LegacyErrorEnvelope};
use crate::store::{TokenStore, ACCESS_TOKEN_KEY};

/// Generic JSON request executor.
///
/// Builds a request against the configured base URL, attaches bearer auth
/// when asked and a credential exists, and maps every transport/status
/// outcome into [`AuthError`]. Retries are never attempted here; retry
/// policy belongs to the caller.
pub struct HttpTransport {
    base_url: Url,
    client: reqwest::Client,
    tokens: Arc<dyn TokenStore>,
}

impl HttpTransport {
    /// Creates a transport for `base_url`.
    ///
    /// Fails with [`AuthError::InvalidUrl`] when the base URL does not
    /// parse, and with [`AuthError::Network`] when the HTTP client cannot
    /// be constructed.
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, AuthError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| AuthError::InvalidUrl(base_url.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .tcp_keepalive(Duration::from_secs(30))
            .user_agent(concat!("AnivaultClient/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuthError::Network(format!("Client build failed: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            tokens,
        })
    }

    /// Issues a request and returns the raw body bytes of a 2xx response.
    ///
    /// `path` must start with `'/'`; a relative path would silently fuse
    /// with the last base-URL segment, so it is rejected as
    /// [`AuthError::InvalidUrl`] before any network traffic.
    ///
    /// With `attach_auth` set, a stored credential is sent as a bearer
    /// header. A missing credential is not an error at this layer; the
    /// request proceeds unauthenticated and the server rejects with 401 if
    /// it requires auth.
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        attach_auth: bool,
    ) -> Result<Vec<u8>, AuthError> {
        if !path.starts_with('/') {
            return Err(AuthError::InvalidUrl(format!(
                "request path must start with '/': {}",
                path
            )));
        }
        let url = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);

        let mut builder = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            let payload =
                serde_json::to_vec(body).map_err(|e| AuthError::Encoding(e.to_string()))?;
            builder = builder.body(payload);
        }

        if attach_auth {
            if let Some(token) = self.tokens.get(ACCESS_TOKEN_KEY) {
                builder = builder.bearer_auth(token);
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AuthError::Network(format!("Failed to read response body: {}", e)))?;

        if status.is_success() {
            log::debug!("{} -> {}", url, status);
            Ok(bytes.to_vec())
        } else {
            Err(map_failure(status, &bytes))
        }
    }

    /// Like [`HttpTransport::send`], but decodes the 2xx body into `T`.
    pub async fn request<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        attach_auth: bool,
    ) -> Result<T, AuthError> {
        let bytes = self.send(method, path, body, attach_auth).await?;
        serde_json::from_slice(&bytes).map_err(|e| AuthError::Decoding(e.to_string()))
    }
}

/// Maps a non-2xx status and response body into an [`AuthError`].
///
/// Shared by every operation so new endpoints inherit consistent error
/// semantics. The structured envelope is tried first, then the legacy
/// `{error, reason}` shape; anything unparseable falls back to
/// `Server { status, raw body }`.
pub(crate) fn map_failure(status: StatusCode, body: &[u8]) -> AuthError {
    let message = extract_message(body);
    match status.as_u16() {
        400 => AuthError::Validation(message.unwrap_or_else(|| "Invalid request.".to_string())),
        401 => AuthError::InvalidCredentials,
        403 => AuthError::EmailUnverified,
        409 => AuthError::Conflict(message.unwrap_or_else(|| "Conflict.".to_string())),
        code => AuthError::Server {
            status: code,
            message: message.unwrap_or_else(|| String::from_utf8_lossy(body).into_owned()),
        },
    }
}

fn extract_message(body: &[u8]) -> Option<String> {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return Some(envelope.error.message);
    }
    if let Ok(legacy) = serde_json::from_slice::<LegacyErrorEnvelope>(body) {
        return Some(legacy.reason);
    }
    None
}
