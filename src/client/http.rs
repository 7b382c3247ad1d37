// File: ./src/client/http.rs
// Shared HTTPS client stack and a request helper with a deadline.
use crate::client::middleware::{UserAgentLayer, UserAgentService, default_user_agent};
use crate::client::redirect::{FollowRedirectLayer, FollowRedirectService};
use anyhow::{Context, Result, anyhow};
use http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::{Bytes, Incoming};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tower::{ServiceBuilder, ServiceExt};
use tower_service::Service;

pub const MAX_REDIRECTS: usize = 5;

pub type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;
pub type HttpStack = FollowRedirectService<UserAgentService<HttpsClient>>;

/// Status and collected body of a finished request.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Turns a non-2xx reply into an error carrying the status and body.
    pub fn error_for_status(self, what: &str) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(anyhow!("{} failed with {}: {}", what, self.status, self.text()))
    }
}

pub fn build_stack() -> HttpStack {
    build_stack_with(FollowRedirectLayer::new(MAX_REDIRECTS))
}

pub fn build_stack_with(redirects: FollowRedirectLayer) -> HttpStack {
    let mut root_store = rustls::RootCertStore::empty();
    let result = rustls_native_certs::load_native_certs();
    root_store.add_parsable_certificates(result.certs);
    if root_store.is_empty() {
        // Plain-http endpoints still work; https requests will fail the handshake.
        log::warn!("No valid system certificates found.");
    }
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let https_connector = HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .build();

    let http_client: HttpsClient = Client::builder(TokioExecutor::new()).build(https_connector);
    ServiceBuilder::new()
        .layer(redirects)
        .layer(UserAgentLayer::new(&default_user_agent()))
        .service(http_client)
}

/// Sends `req` through `service`, failing if either the response or its body takes
/// longer than `limit`.
pub async fn execute<S>(service: S, req: Request<String>, limit: Duration) -> Result<HttpReply>
where
    S: Service<Request<String>, Response = Response<Incoming>>,
    S::Error: std::error::Error + Send + Sync + 'static,
{
    let target = format!("{} {}", req.method(), req.uri());
    let response = tokio::time::timeout(limit, service.oneshot(req))
        .await
        .map_err(|_| anyhow!("{} timed out", target))?
        .with_context(|| format!("{} failed", target))?;

    let status = response.status();
    let body = tokio::time::timeout(limit, response.into_body().collect())
        .await
        .map_err(|_| anyhow!("Reading body of {} timed out", target))?
        .with_context(|| format!("Reading body of {} failed", target))?
        .to_bytes();
    log::debug!("{} -> {} ({} bytes)", target, status, body.len());
    Ok(HttpReply { status, body })
}
