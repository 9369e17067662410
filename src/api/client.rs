use super::models::*;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;

/// Position in a paginated listing. Modern listings page by number, legacy
/// listings by record offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Page(u32),
    Offset(u32),
}

impl Cursor {
    /// True when `self` lies strictly beyond `previous` in the same listing.
    pub fn advances_past(&self, previous: &Cursor) -> bool {
        match (self, previous) {
            (Cursor::Page(next), Cursor::Page(prev)) => next > prev,
            (Cursor::Offset(next), Cursor::Offset(prev)) => next > prev,
            _ => false,
        }
    }
}

/// One page of a listing. `next` is `None` on the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<Cursor>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// The provider operations the updater needs, independent of API generation.
#[async_trait]
pub trait DnsApiClient: Send + Sync {
    /// Cursor of the first page of any listing.
    fn first_page(&self) -> Cursor;

    /// Whether a record named with the bare subdomain label counts as a match.
    fn accepts_bare_subdomain(&self) -> bool {
        false
    }

    async fn list_zones(&self, cursor: Cursor) -> Result<Page<Zone>>;

    async fn list_records(&self, zone: &Zone, cursor: Cursor) -> Result<Page<DnsRecord>>;

    /// Writes `record` back to the provider. Must be called at most once per run.
    async fn update_record(&self, zone: &Zone, record: &DnsRecord) -> Result<()>;
}

/// Fails with `UnexpectedStatusCode` on anything outside 200-299 and
/// otherwise hands back the body.
pub(crate) async fn read_success_body(response: reqwest::Response, request: &str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(DdnsError::UnexpectedStatusCode {
            status: status.as_u16(),
            request: request.to_string(),
        });
    }
    Ok(response.text().await?)
}

pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        DdnsError::Provider(format!("failed to parse API response: {}. Response: {}", e, text))
    })
}
