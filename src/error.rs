use std::path::PathBuf;

use thiserror::Error;

use crate::report::Status;

pub type Result<T> = std::result::Result<T, DdnsError>;

/// Everything that can end a run early. None of these are retried.
#[derive(Debug, Error)]
pub enum DdnsError {
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("failed to discover public IP: {0}")]
    IpDiscovery(String),

    #[error("can't find zone '{0}'")]
    ZoneNotFound(String),

    #[error("can't find record '{0}'")]
    RecordNotFound(String),

    #[error("Cloudflare returned an unexpected status code: {status}, for request: {request}")]
    UnexpectedStatusCode { status: u16, request: String },

    #[error("updating record failed with the response: '{0}'")]
    UpdateFailed(String),

    #[error("unexpected provider response: {0}")]
    Provider(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl DdnsError {
    /// Failures that happen before any provider call was possible are critical.
    pub fn status(&self) -> Status {
        match self {
            Self::ConfigNotFound(_) | Self::ConfigInvalid(_) => Status::Critical,
            _ => Status::Error,
        }
    }
}
