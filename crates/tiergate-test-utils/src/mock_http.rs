// SPDX-FileCopyrightText: 2026 Tiergate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted [`HttpCaller`] for deterministic classifier tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;

use tiergate_core::{HttpCaller, HttpResponse, RouterError};

/// Chat-completions response body whose first choice says `content`.
pub fn chat_completion(content: &str) -> Value {
    json!({
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}}
        ]
    })
}

#[derive(Debug, Clone)]
enum Reply {
    Response { status: u16, body: Value },
    Failure(String),
}

/// One recorded call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: Value,
    pub timeout: Duration,
}

/// HTTP caller that pops replies from a FIFO queue.
///
/// An empty queue answers with a transport error, so an unexpected call shows
/// up as a degraded classification rather than a hang.
#[derive(Clone, Default)]
pub struct MockHttpCaller {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    delay: Option<Duration>,
}

impl MockHttpCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a 200 chat completion saying `content`.
    pub async fn reply_with_content(&self, content: &str) {
        self.push(Reply::Response {
            status: 200,
            body: chat_completion(content),
        })
        .await;
    }

    /// Queue a bare status with an empty JSON body.
    pub async fn reply_with_status(&self, status: u16) {
        self.push(Reply::Response {
            status,
            body: json!({}),
        })
        .await;
    }

    /// Queue a raw response body.
    pub async fn reply_with_body(&self, status: u16, body: Value) {
        self.push(Reply::Response { status, body }).await;
    }

    /// Queue a transport failure.
    pub async fn fail_with(&self, message: &str) {
        self.push(Reply::Failure(message.to_string())).await;
    }

    async fn push(&self, reply: Reply) {
        self.replies.lock().await.push_back(reply);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl HttpCaller for MockHttpCaller {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<HttpResponse, RouterError> {
        self.requests.lock().await.push(RecordedRequest {
            url: url.to_string(),
            body: body.clone(),
            timeout,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.lock().await.pop_front() {
            Some(Reply::Response { status, body }) => Ok(HttpResponse { status, body }),
            Some(Reply::Failure(message)) => Err(RouterError::Http {
                message,
                source: None,
            }),
            None => Err(RouterError::Http {
                message: "no mock reply queued".into(),
                source: None,
            }),
        }
    }
}
