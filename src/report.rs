use std::fmt;
use std::net::Ipv4Addr;

use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unchanged,
    Updated,
    Error,
    Critical,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Unchanged => "unchanged",
            Status::Updated => "updated",
            Status::Error => "error",
            Status::Critical => "critical",
        };
        f.pad(name)
    }
}

/// The one line a run leaves behind. env_logger supplies the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    pub target: Option<String>,
    pub ip: Option<Ipv4Addr>,
    pub message: Option<String>,
}

impl Report {
    pub fn new(status: Status, target: Option<&str>, ip: Option<Ipv4Addr>) -> Self {
        Self {
            status,
            target: target.map(str::to_string),
            ip,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn emit(&self) {
        match self.status {
            Status::Unchanged | Status::Updated => info!("{}", self),
            Status::Error | Status::Critical => error!("{}", self),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}, {}, ", self.status, self.target.as_deref().unwrap_or("-"))?;
        match self.ip {
            Some(ip) => write!(f, "{}", ip)?,
            None => f.write_str("-")?,
        }
        if let Some(message) = &self.message {
            write!(f, ", '{}'", message)?;
        }
        Ok(())
    }
}
