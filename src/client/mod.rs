// File: ./src/client/mod.rs
//! Boundaries to the outside world. The job only talks to these traits, so a run can
//! be driven against in-memory fakes.
pub mod calendar;
pub mod forecast;
pub mod http;
pub mod mail;
pub mod middleware;
pub mod redirect;
pub mod s3;
pub mod slack;

use crate::people::{Assignment, PersonRecord};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

pub use calendar::HttpCalendarSource;
pub use forecast::ForecastClient;
pub use mail::SmtpMailer;
pub use s3::S3BlobStore;
pub use slack::SlackWebhook;

#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
}

#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

#[async_trait]
pub trait PeopleDirectory: Send + Sync {
    async fn people(&self) -> Result<Vec<PersonRecord>>;
}

#[async_trait]
pub trait AssignmentWriter: Send + Sync {
    async fn create(&self, assignment: &Assignment) -> Result<()>;
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns `Ok(false)` when the object does not exist yet.
    async fn download_to(&self, key: &str, path: &Path) -> Result<bool>;
    async fn upload_from(&self, key: &str, path: &Path) -> Result<()>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<()>;
}
