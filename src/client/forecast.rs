// File: ./src/client/forecast.rs
// Resource planner API: the people listing and time-off assignments.
use crate::client::http::{HttpStack, MAX_REDIRECTS, build_stack_with, execute};
use crate::client::redirect::FollowRedirectLayer;
use crate::client::{AssignmentWriter, PeopleDirectory};
use crate::config::ForecastConfig;
use crate::people::{Assignment, PersonRecord, decode_people};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use http::{HeaderName, HeaderValue, Method, Request, Uri};
use std::time::Duration;
use tower_http::auth::AddAuthorization;

const ACCOUNT_HEADER: &str = "forecast-account-id";

#[derive(Clone, Debug)]
pub struct ForecastClient {
    stack: AddAuthorization<HttpStack>,
    base_url: String,
    account_id: HeaderValue,
    timeout: Duration,
}

impl ForecastClient {
    pub fn new(config: &ForecastConfig, timeout: Duration) -> Result<Self> {
        // AddAuthorization panics on tokens that are not valid header values.
        HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| anyhow!("Planner token contains invalid characters"))?;
        let account_id = HeaderValue::from_str(&config.account_id)
            .map_err(|_| anyhow!("Planner account id contains invalid characters"))?;
        let redirects = FollowRedirectLayer::new(MAX_REDIRECTS)
            .sensitive_header(HeaderName::from_static(ACCOUNT_HEADER));
        Ok(Self {
            stack: AddAuthorization::bearer(build_stack_with(redirects), &config.token),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            account_id,
            timeout,
        })
    }

    fn uri(&self, path: &str) -> Result<Uri> {
        let raw = format!("{}/{}", self.base_url, path);
        raw.parse()
            .with_context(|| format!("Invalid planner URL '{}'", raw))
    }
}

#[async_trait]
impl PeopleDirectory for ForecastClient {
    async fn people(&self) -> Result<Vec<PersonRecord>> {
        let req = Request::builder()
            .method(Method::GET)
            .uri(self.uri("people")?)
            .header(ACCOUNT_HEADER, self.account_id.clone())
            .body(String::new())?;
        let reply = execute(self.stack.clone(), req, self.timeout)
            .await?
            .error_for_status("People listing")?;

        let (people, errors) = decode_people(&reply.body)?;
        for error in &errors {
            log::warn!("Skipping planner record: {}", error);
        }
        log::info!("Loaded {} people from the planner", people.len());
        Ok(people)
    }
}

#[async_trait]
impl AssignmentWriter for ForecastClient {
    async fn create(&self, assignment: &Assignment) -> Result<()> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri("assignments")?)
            .header(ACCOUNT_HEADER, self.account_id.clone())
            .header(http::header::CONTENT_TYPE, "application/json; charset=UTF-8")
            .body(assignment.to_request_body()?)?;
        let reply = execute(self.stack.clone(), req, self.timeout)
            .await?
            .error_for_status("Assignment creation")?;
        log::debug!("Assignment response: {}", reply.text());
        Ok(())
    }
}
