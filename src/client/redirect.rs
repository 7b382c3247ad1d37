// File: ./src/client/redirect.rs
//! Redirect following for calendar downloads. Share links for the time-off feed
//! usually bounce through one or two `Location` hops before serving the file.
use http::header::{AUTHORIZATION, COOKIE, HeaderName, PROXY_AUTHORIZATION};
use http::{Method, Request, Response, StatusCode, Uri};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower_layer::Layer;
use tower_service::Service;

#[derive(Clone, Debug)]
pub struct FollowRedirectLayer {
    max_redirects: usize,
    sensitive: Vec<HeaderName>,
}

impl FollowRedirectLayer {
    pub fn new(max_redirects: usize) -> Self {
        Self {
            max_redirects,
            sensitive: vec![AUTHORIZATION, PROXY_AUTHORIZATION, COOKIE],
        }
    }

    /// Also drop `name` when a redirect leaves the original origin.
    pub fn sensitive_header(mut self, name: HeaderName) -> Self {
        self.sensitive.push(name);
        self
    }
}

impl<S> Layer<S> for FollowRedirectLayer {
    type Service = FollowRedirectService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FollowRedirectService {
            inner,
            max_redirects: self.max_redirects,
            sensitive: self.sensitive.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FollowRedirectService<S> {
    inner: S,
    max_redirects: usize,
    sensitive: Vec<HeaderName>,
}

/// Resolves a `Location` header against the URI that produced it.
/// Relative locations inherit scheme and authority from `base`.
pub fn resolve_location(base: &Uri, location: &str) -> Option<Uri> {
    let parts = location.parse::<Uri>().ok()?.into_parts();
    let mut builder = Uri::builder();
    match (parts.scheme, base.scheme()) {
        (Some(scheme), _) => builder = builder.scheme(scheme),
        (None, Some(scheme)) => builder = builder.scheme(scheme.clone()),
        (None, None) => {}
    }
    match (parts.authority, base.authority()) {
        (Some(authority), _) => builder = builder.authority(authority),
        (None, Some(authority)) => builder = builder.authority(authority.clone()),
        (None, None) => {}
    }
    let path = parts
        .path_and_query
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    builder.path_and_query(path).build().ok()
}

// `http::Request` is not `Clone`; extensions are not carried over.
fn clone_request<B: Clone>(req: &Request<B>) -> Request<B> {
    let mut copy = Request::new(req.body().clone());
    *copy.method_mut() = req.method().clone();
    *copy.uri_mut() = req.uri().clone();
    *copy.version_mut() = req.version();
    *copy.headers_mut() = req.headers().clone();
    copy
}

fn same_origin(a: &Uri, b: &Uri) -> bool {
    a.scheme() == b.scheme() && a.authority() == b.authority()
}

/// Credentials stay with the origin they were issued for.
fn strip_sensitive<B>(req: &mut Request<B>, target: &Uri, sensitive: &[HeaderName]) {
    if same_origin(req.uri(), target) {
        return;
    }
    for name in sensitive {
        req.headers_mut().remove(name);
    }
}

fn follows(status: StatusCode, method: &Method) -> bool {
    // 303 always continues as a GET; the others keep the method.
    if status == StatusCode::SEE_OTHER {
        return true;
    }
    let keeps_method = [
        StatusCode::MOVED_PERMANENTLY,
        StatusCode::FOUND,
        StatusCode::TEMPORARY_REDIRECT,
        StatusCode::PERMANENT_REDIRECT,
    ]
    .contains(&status);
    keeps_method && (*method == Method::GET || *method == Method::HEAD)
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for FollowRedirectService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    ReqBody: Clone + Default + Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let mut inner = self.inner.clone();
        let max_redirects = self.max_redirects;
        let sensitive = self.sensitive.clone();

        Box::pin(async move {
            let mut current = req;
            let mut hops = 0;
            loop {
                let retry = clone_request(&current);
                let response = inner.call(current).await?;

                let status = response.status();
                let next = response
                    .headers()
                    .get(http::header::LOCATION)
                    .and_then(|l| l.to_str().ok())
                    .and_then(|l| resolve_location(retry.uri(), l));

                match next {
                    Some(uri) if hops < max_redirects && follows(status, retry.method()) => {
                        log::debug!("Following {} redirect to {}", status, uri);
                        current = retry;
                        if status == StatusCode::SEE_OTHER {
                            *current.method_mut() = Method::GET;
                            *current.body_mut() = ReqBody::default();
                        }
                        strip_sensitive(&mut current, &uri, &sensitive);
                        *current.uri_mut() = uri;
                        hops += 1;
                    }
                    _ => return Ok(response),
                }
            }
        })
    }
}
