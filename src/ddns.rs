use log::info;
use std::net::Ipv4Addr;

use crate::api::{CloudflareClient, DnsApiClient, DnsRecord, LegacyClient, Zone};
use crate::config::{ApiShape, Config, Credentials};
use crate::error::{DdnsError, Result};
use crate::ip::{self, IpSource};
use crate::report::{Report, Status};
use crate::resolve::{self, Resolved};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Unchanged {
        target: String,
        ip: Ipv4Addr,
    },
    Updated {
        target: String,
        ip: Ipv4Addr,
        previous: String,
    },
}

impl Outcome {
    pub fn report(&self) -> Report {
        match self {
            Outcome::Unchanged { target, ip } => {
                Report::new(Status::Unchanged, Some(target.as_str()), Some(*ip))
            }
            Outcome::Updated { target, ip, previous } => {
                Report::new(Status::Updated, Some(target.as_str()), Some(*ip))
                    .with_message(format!("was {}", previous))
            }
        }
    }
}

/// One-shot updater for a single (domain, subdomain) A record.
pub struct CloudflareDdns {
    config: Config,
    client: Box<dyn DnsApiClient>,
    ip_source: Box<dyn IpSource>,
}

impl CloudflareDdns {
    pub fn new(config: Config) -> Result<Self> {
        let client = build_client(&config)?;
        let ip_source = ip::from_method(&config.ip_method())?;
        Ok(Self::with_parts(config, client, ip_source))
    }

    pub fn with_parts(
        config: Config,
        client: Box<dyn DnsApiClient>,
        ip_source: Box<dyn IpSource>,
    ) -> Self {
        Self {
            config,
            client,
            ip_source,
        }
    }

    pub fn target_name(&self) -> String {
        resolve::target_name(&self.config.cf_domain, self.config.subdomain())
    }

    pub async fn run(&self) -> Result<Outcome> {
        let current_ip = self.ip_source.current().await?;
        if !self.config.quiet {
            info!("Current IP: {} (via {})", current_ip, self.ip_source.describe());
        }

        let Resolved { zone, record } =
            resolve::resolve(self.client.as_ref(), &self.config.cf_domain, self.config.subdomain())
                .await?;

        if !self.config.quiet {
            if let Ok(json) = serde_json::to_string_pretty(&record) {
                info!("{}", json);
            }
        }

        self.apply(&zone, record, current_ip).await
    }

    /// Writes `ip` into `record` unless it is already there.
    async fn apply(&self, zone: &Zone, record: DnsRecord, ip: Ipv4Addr) -> Result<Outcome> {
        let target = self.target_name();
        let content = ip.to_string();

        if record.content == content {
            return Ok(Outcome::Unchanged { target, ip });
        }

        let previous = record.content.clone();
        let mut updated = record;
        updated.content = content;
        if let Some(proxied) = self.config.cf_service_mode {
            updated.proxied = Some(proxied);
        }
        if let Some(ttl) = self.config.cf_ttl {
            updated.ttl = Some(ttl);
        }

        self.client.update_record(zone, &updated).await?;

        Ok(Outcome::Updated {
            target,
            ip,
            previous,
        })
    }

    /// The terminal log line for `result`, or `None` when quiet hides it.
    pub fn report_for(&self, result: &Result<Outcome>) -> Option<Report> {
        match result {
            Ok(Outcome::Unchanged { .. }) if self.config.quiet => None,
            Ok(outcome) => Some(outcome.report()),
            Err(e) => Some(
                Report::new(e.status(), Some(self.target_name().as_str()), None)
                    .with_message(e.to_string()),
            ),
        }
    }
}

fn build_client(config: &Config) -> Result<Box<dyn DnsApiClient>> {
    let credentials = config.credentials().ok_or_else(|| {
        DdnsError::ConfigInvalid("either cf_token or both cf_key and cf_email are required".into())
    })?;
    let base_url = config.cf_api_url.as_deref();

    match (config.api, credentials) {
        (ApiShape::Modern, credentials) => Ok(Box::new(CloudflareClient::new(credentials, base_url))),
        (ApiShape::Legacy, Credentials::Key { key, email }) => Ok(Box::new(LegacyClient::new(
            &key,
            &email,
            &config.cf_domain,
            base_url,
        ))),
        (ApiShape::Legacy, Credentials::Token(_)) => Err(DdnsError::ConfigInvalid(
            "the legacy API requires cf_key and cf_email".into(),
        )),
    }
}
