// File: ./src/client/slack.rs
use crate::client::ChatNotifier;
use crate::client::http::{HttpStack, build_stack, execute};
use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{Method, Request, Uri};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts plain text to an incoming chat webhook.
#[derive(Clone, Debug)]
pub struct SlackWebhook {
    stack: HttpStack,
    url: Uri,
    timeout: Duration,
}

impl SlackWebhook {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url: Uri = url
            .parse()
            .with_context(|| format!("Invalid webhook URL '{}'", url))?;
        Ok(Self {
            stack: build_stack(),
            url,
            timeout,
        })
    }
}

#[async_trait]
impl ChatNotifier for SlackWebhook {
    async fn notify(&self, text: &str) -> Result<()> {
        let body = serde_json::to_string(&WebhookPayload { text })?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.url.clone())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)?;
        execute(self.stack.clone(), req, self.timeout)
            .await?
            .error_for_status("Webhook post")?;
        Ok(())
    }
}
