// File: ./src/client/middleware.rs
//! Tower middleware stamping every outgoing request with the job's User-Agent.
use http::{HeaderValue, Request};
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

pub fn default_user_agent() -> String {
    format!("leavebot/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Clone, Debug)]
pub struct UserAgentLayer {
    value: Option<HeaderValue>,
}

impl UserAgentLayer {
    /// An agent string that is not a valid header value is dropped with a warning.
    pub fn new(user_agent: &str) -> Self {
        let value = HeaderValue::from_str(user_agent)
            .map_err(|_| log::warn!("Ignoring invalid User-Agent '{}'", user_agent))
            .ok();
        Self { value }
    }
}

impl<S> Layer<S> for UserAgentLayer {
    type Service = UserAgentService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UserAgentService {
            inner,
            value: self.value.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct UserAgentService<S> {
    inner: S,
    value: Option<HeaderValue>,
}

impl<S, ReqBody> Service<Request<ReqBody>> for UserAgentService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        if let Some(value) = &self.value {
            req.headers_mut()
                .entry(http::header::USER_AGENT)
                .or_insert_with(|| value.clone());
        }
        self.inner.call(req)
    }
}
