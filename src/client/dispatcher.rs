//! HTTP dispatcher for ThingsBoard REST calls.

use super::error::upstream_message;
use super::request::RequestSpec;
use crate::error::{ApiError, Error};
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Header carrying the `ApiKey ...` / `Bearer ...` credential.
pub const AUTH_HEADER: &str = "X-Authorization";

/// Connection timeout. Request timeouts are left to the client defaults.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client.
#[must_use]
pub fn create_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Sends [`RequestSpec`]s with an auth header attached and normalizes failures.
///
/// Nothing is retried: every non-2xx status and every transport failure
/// surfaces as [`ApiError`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: reqwest::Client,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(create_http_client())
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    /// Perform `spec` against `base_url` and return the decoded body.
    ///
    /// Empty query values are dropped, empty bodies are not sent. A 2xx
    /// response body is returned as-is: JSON when it parses, a JSON string
    /// otherwise, `null` when empty.
    pub async fn send(
        &self,
        spec: &RequestSpec,
        base_url: &str,
        auth_header: &str,
    ) -> Result<Value, Error> {
        let endpoint = spec.endpoint();
        let url = format!("{base_url}{}", spec.path);
        let header = HeaderValue::from_str(auth_header)
            .map_err(|_| Error::Auth("auth header contains invalid header characters".into()))?;

        let mut request = self
            .client
            .request(spec.method.into(), &url)
            .header(AUTH_HEADER, header)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        let query = spec.cleaned_query();
        if !query.is_empty() {
            request = request.query(&query);
        }
        if let Some(body) = spec.body_to_send() {
            request = request.json(body);
        }

        tracing::debug!(%endpoint, params = query.len(), "dispatching request");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(&endpoint, &e))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&endpoint, &e))?;

        tracing::debug!(%endpoint, status = status.as_u16(), "response received");

        if status.as_u16() >= 400 {
            let code = status.as_u16();
            let message = upstream_message(&text).unwrap_or_else(|| format!("HTTP {code}"));
            return Err(ApiError {
                status: Some(code),
                message,
                endpoint,
            }
            .into());
        }

        Ok(decode_body(&text))
    }
}

fn transport_error(endpoint: &str, err: &reqwest::Error) -> Error {
    ApiError {
        status: None,
        message: format!("Failed to connect to ThingsBoard API: {err}"),
        endpoint: endpoint.to_string(),
    }
    .into()
}

fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
