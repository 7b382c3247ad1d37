// File: ./src/client/calendar.rs
use crate::client::CalendarSource;
use crate::client::http::{HttpStack, build_stack, execute};
use anyhow::{Context, Result};
use async_trait::async_trait;
use http::{Method, Request, Uri};
use std::time::Duration;

/// Downloads the time-off feed from its share link.
#[derive(Clone, Debug)]
pub struct HttpCalendarSource {
    stack: HttpStack,
    url: Uri,
    timeout: Duration,
}

impl HttpCalendarSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let url: Uri = url
            .parse()
            .with_context(|| format!("Invalid calendar URL '{}'", url))?;
        Ok(Self {
            stack: build_stack(),
            url,
            timeout,
        })
    }
}

#[async_trait]
impl CalendarSource for HttpCalendarSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.url.clone())
            .header(http::header::ACCEPT, "text/calendar")
            .body(String::new())?;
        let reply = execute(self.stack.clone(), req, self.timeout)
            .await?
            .error_for_status("Calendar download")?;
        log::info!("Fetched calendar ({} bytes)", reply.body.len());
        Ok(reply.body.to_vec())
    }
}
