mod api;
mod config;
mod ddns;
mod error;
mod ip;
mod report;
mod resolve;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use ddns::CloudflareDdns;
use report::Report;

/// Point a Cloudflare A record at this host's public IP, once.
#[derive(Debug, Parser)]
#[command(about)]
struct Cli {
    /// Config file; relative paths are taken from the executable's directory
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let exe = std::env::current_exe().context("Failed to locate the executable")?;
    let exe_dir = exe.parent().unwrap_or(Path::new("."));
    let config_path = config::resolve_path(cli.config.as_deref(), exe_dir);

    let ddns = match Config::load(&config_path).and_then(CloudflareDdns::new) {
        Ok(ddns) => ddns,
        Err(e) => {
            Report::new(e.status(), None, None)
                .with_message(e.to_string())
                .emit();
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to start with {}", config_path.display())));
        }
    };

    let result = ddns.run().await;
    if let Some(report) = ddns.report_for(&result) {
        report.emit();
    }

    result.map(|_| ()).context("DDNS update failed")
}
