use super::client::{parse_body, read_success_body, Cursor, DnsApiClient, Page};
use super::models::*;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const LEGACY_API_URL: &str = "https://www.cloudflare.com/api_json.html";

// rec_edit requires a ttl; 1 means automatic.
const AUTOMATIC_TTL: u32 = 1;

/// Client for the single-endpoint `api_json.html` API. Every call is a form
/// POST whose `a` parameter names the action; records are scoped by domain.
pub struct LegacyClient {
    client: reqwest::Client,
    endpoint: String,
    key: String,
    email: String,
    domain: String,
}

#[derive(Debug, Deserialize)]
struct LegacyResponse<T> {
    result: String,
    #[serde(default)]
    msg: Option<String>,
    response: Option<T>,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    recs: RecordListing,
}

#[derive(Debug, Deserialize)]
struct RecordListing {
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    count: u32,
    #[serde(default)]
    objs: Vec<LegacyRecord>,
}

#[derive(Debug, Deserialize)]
struct LegacyRecord {
    rec_id: String,
    name: String,
    #[serde(rename = "type")]
    record_type: String,
    content: String,
    ttl: Value,
    #[serde(default)]
    service_mode: Option<Value>,
}

impl TryFrom<LegacyRecord> for DnsRecord {
    type Error = DdnsError;

    fn try_from(rec: LegacyRecord) -> Result<Self> {
        let ttl = numeric(&rec.ttl)
            .ok_or_else(|| DdnsError::Provider(format!("invalid ttl {} on {}", rec.ttl, rec.name)))?;

        Ok(DnsRecord {
            id: rec.rec_id,
            r#type: rec.record_type,
            name: rec.name,
            content: rec.content,
            ttl: Some(ttl),
            proxied: rec.service_mode.as_ref().and_then(numeric).map(|mode| mode == 1),
            extra: Map::new(),
        })
    }
}

// The legacy API sends numbers as strings ("1") more often than not.
fn numeric(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl DnsApiClient for LegacyClient {
    fn first_page(&self) -> Cursor {
        Cursor::Offset(0)
    }

    // Kept for records created when the API matched on the bare label.
    fn accepts_bare_subdomain(&self) -> bool {
        true
    }

    /// The legacy API has no zone ids: the configured domain is the only zone.
    async fn list_zones(&self, _cursor: Cursor) -> Result<Page<Zone>> {
        Ok(Page::last(vec![Zone {
            id: self.domain.clone(),
            name: self.domain.clone(),
        }]))
    }

    async fn list_records(&self, zone: &Zone, cursor: Cursor) -> Result<Page<DnsRecord>> {
        let Cursor::Offset(offset) = cursor else {
            return Err(DdnsError::Provider(format!(
                "offset listing given {:?}",
                cursor
            )));
        };

        debug!("rec_load_all {} offset {}", zone.id, offset);
        let offset_param = offset.to_string();
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[
                ("a", "rec_load_all"),
                ("tkn", self.key.as_str()),
                ("email", self.email.as_str()),
                ("z", zone.id.as_str()),
                ("o", offset_param.as_str()),
            ])
            .send()
            .await?;

        let text = read_success_body(response, "rec_load_all").await?;
        let parsed: LegacyResponse<RecordsResponse> = parse_body(&text)?;

        if parsed.result != "success" {
            return Err(DdnsError::Provider(format!(
                "rec_load_all failed: {}",
                parsed.msg.unwrap_or(text)
            )));
        }

        let listing = parsed
            .response
            .ok_or_else(|| DdnsError::Provider(format!("response has no recs: {}", text)))?
            .recs;

        let next = listing
            .has_more
            .then(|| Cursor::Offset(offset.saturating_add(listing.count)));

        let items = listing
            .objs
            .into_iter()
            .map(DnsRecord::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, next })
    }

    async fn update_record(&self, zone: &Zone, record: &DnsRecord) -> Result<()> {
        let ttl = record.ttl.unwrap_or(AUTOMATIC_TTL).to_string();
        let mut form = vec![
            ("a", "rec_edit"),
            ("tkn", self.key.as_str()),
            ("email", self.email.as_str()),
            ("z", zone.id.as_str()),
            ("id", record.id.as_str()),
            ("type", record.r#type.as_str()),
            ("name", record.name.as_str()),
            ("content", record.content.as_str()),
            ("ttl", ttl.as_str()),
        ];
        if let Some(proxied) = record.proxied {
            form.push(("service_mode", if proxied { "1" } else { "0" }));
        }

        let response = self.client.post(&self.endpoint).form(&form).send().await?;

        let text = read_success_body(response, "rec_edit").await?;
        let parsed: LegacyResponse<Value> = parse_body(&text)?;

        if parsed.result != "success" {
            return Err(DdnsError::UpdateFailed(text));
        }

        Ok(())
    }
}

impl LegacyClient {
    pub fn new(key: &str, email: &str, domain: &str, endpoint: Option<&str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.unwrap_or(LEGACY_API_URL).to_string(),
            key: key.to_string(),
            email: email.to_string(),
            domain: domain.to_string(),
        }
    }
}
