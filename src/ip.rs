use std::io::ErrorKind;
use std::net::Ipv4Addr;

use async_trait::async_trait;
use log::debug;
use tokio::process::Command;

use crate::api::read_success_body;
use crate::config::IpMethod;
use crate::error::{DdnsError, Result};

/// Source of the host's externally visible IPv4 address.
#[async_trait]
pub trait IpSource: Send + Sync {
    async fn current(&self) -> Result<Ipv4Addr>;

    /// Human readable origin, for logs.
    fn describe(&self) -> String;
}

pub fn from_method(method: &IpMethod) -> Result<Box<dyn IpSource>> {
    match method {
        IpMethod::HttpLookup { url } => Ok(Box::new(HttpIpSource::new(url))),
        IpMethod::MetadataService { argv } | IpMethod::ExternalCommand { argv } => {
            Ok(Box::new(CommandIpSource::new(argv)?))
        }
    }
}

/// Asks an IP echo service; the whole trimmed body must be the address.
pub struct HttpIpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpIpSource {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DdnsError::IpDiscovery(format!("request to {} failed: {}", self.url, e)))?;

        let body = read_success_body(response, &self.url).await?;

        parse_ipv4(&body, &self.url)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Runs a local command (metadata query, resolver lookup) and parses stdout.
pub struct CommandIpSource {
    program: String,
    args: Vec<String>,
}

impl CommandIpSource {
    pub fn new(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| DdnsError::ConfigInvalid("IP discovery command is empty".into()))?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl IpSource for CommandIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        debug!("running {}", self.describe());
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    DdnsError::IpDiscovery(format!("command not found: {}", self.program))
                }
                _ => DdnsError::IpDiscovery(format!("failed to run {}: {}", self.program, e)),
            })?;

        if !output.status.success() {
            return Err(DdnsError::IpDiscovery(format!(
                "`{}` failed with {}: {}",
                self.describe(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_ipv4(&String::from_utf8_lossy(&output.stdout), &self.describe())
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub(crate) fn parse_ipv4(text: &str, origin: &str) -> Result<Ipv4Addr> {
    let trimmed = text.trim();
    trimmed.parse().map_err(|_| {
        DdnsError::IpDiscovery(format!("{} returned {:?}, not an IPv4 address", origin, trimmed))
    })
}
