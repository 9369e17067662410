use super::client::{parse_body, read_success_body, Cursor, DnsApiClient, Page};
use super::models::*;
use crate::config::Credentials;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const API_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Client for the zone/record REST API (`/client/v4`).
pub struct CloudflareClient {
    client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

#[async_trait]
impl DnsApiClient for CloudflareClient {
    fn first_page(&self) -> Cursor {
        Cursor::Page(1)
    }

    async fn list_zones(&self, cursor: Cursor) -> Result<Page<Zone>> {
        let url = format!("{}/zones", self.base_url);
        self.get_page(&url, cursor).await
    }

    async fn list_records(&self, zone: &Zone, cursor: Cursor) -> Result<Page<DnsRecord>> {
        let url = format!("{}/zones/{}/dns_records", self.base_url, zone.id);
        self.get_page(&url, cursor).await
    }

    async fn update_record(&self, zone: &Zone, record: &DnsRecord) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, zone.id, record.id
        );

        let response = self
            .authorize(self.client.put(&url))
            .json(record)
            .send()
            .await?;

        let text = read_success_body(response, &url).await?;
        let update_response: ApiResponse<Value> = parse_body(&text)?;

        if !update_response.success || !update_response.errors.is_empty() {
            return Err(DdnsError::UpdateFailed(text));
        }

        Ok(())
    }
}

impl CloudflareClient {
    pub fn new(credentials: Credentials, base_url: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url
                .unwrap_or(API_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            credentials,
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => request.bearer_auth(token),
            Credentials::Key { key, email } => request
                .header("X-Auth-Key", key)
                .header("X-Auth-Email", email),
        }
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str, cursor: Cursor) -> Result<Page<T>> {
        let Cursor::Page(page) = cursor else {
            return Err(DdnsError::Provider(format!(
                "page-numbered listing given {:?}",
                cursor
            )));
        };

        debug!("GET {} page {}", url, page);
        let response = self
            .authorize(self.client.get(url))
            .query(&[("page", page)])
            .send()
            .await?;

        let text = read_success_body(response, url).await?;
        let parsed: ApiResponse<Vec<T>> = parse_body(&text)?;

        if !parsed.success {
            return Err(DdnsError::Provider(format!(
                "API request failed: {:?}",
                parsed.errors
            )));
        }

        let items = parsed
            .result
            .ok_or_else(|| DdnsError::Provider(format!("response has no result: {}", text)))?;

        // No result_info means the listing fits on one page.
        let next = match parsed.result_info {
            Some(info) if page < info.total_pages => Some(Cursor::Page(page + 1)),
            _ => None,
        };

        Ok(Page { items, next })
    }
}
