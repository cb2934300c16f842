// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`HttpCaller`].
//!
//! Single attempt per call, no retries. Non-2xx responses are returned as-is
//! so the caller decides how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tiergate_core::{HttpCaller, HttpResponse, RouterError};
use tracing::debug;

/// HTTP caller used for the fallback classifier's upstream request.
#[derive(Debug, Clone)]
pub struct ReqwestCaller {
    client: reqwest::Client,
}

impl ReqwestCaller {
    /// Client without authentication, for a local payment-handling proxy.
    pub fn new() -> Result<Self, RouterError> {
        Self::build(HeaderMap::new())
    }

    /// Client that sends `Authorization: Bearer <api_key>` on every call.
    pub fn with_api_key(api_key: &str) -> Result<Self, RouterError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                RouterError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        Self::build(headers)
    }

    fn build(mut headers: HeaderMap) -> Result<Self, RouterError> {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RouterError::Http {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpCaller for ReqwestCaller {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<HttpResponse, RouterError> {
        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| map_send_error(e, timeout))?;

        let status = response.status();
        debug!(status = %status, url, "upstream response received");

        let text = response.text().await.map_err(|e| map_send_error(e, timeout))?;
        let body = if status.is_success() {
            serde_json::from_str(&text).map_err(|e| RouterError::Http {
                message: format!("failed to parse response body: {e}"),
                source: Some(Box::new(e)),
            })?
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_send_error(err: reqwest::Error, timeout: Duration) -> RouterError {
    if err.is_timeout() {
        RouterError::Timeout { duration: timeout }
    } else {
        RouterError::Http {
            message: format!("HTTP request failed: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_json_and_decodes_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({"model": "m"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let caller = ReqwestCaller::new().unwrap();
        let response = caller
            .post_json(
                &format!("{}/v1/chat/completions", server.uri()),
                &json!({"model": "m"}),
                Duration::from_secs(2),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["ok"], true);
    }

    #[tokio::test]
    async fn api_key_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let caller = ReqwestCaller::with_api_key("sk-test").unwrap();
        let response = caller
            .post_json(&server.uri(), &json!({}), Duration::from_secs(2))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402).set_body_string("payment required"))
            .expect(1)
            .mount(&server)
            .await;

        let caller = ReqwestCaller::new().unwrap();
        let response = caller
            .post_json(&server.uri(), &json!({}), Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(response.status, 402);
        assert_eq!(response.body, json!("payment required"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let caller = ReqwestCaller::new().unwrap();
        let err = caller
            .post_json(&server.uri(), &json!({}), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, RouterError::Timeout { .. }), "got {err:?}");
    }
}
