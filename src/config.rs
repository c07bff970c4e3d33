//! Command-line configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use browser_session::BrowserOptions;
use clap::Parser;
use compat_checker::CheckerConfig;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "byod-compat",
    version,
    about = "Carrier compatibility check service for 15-digit IMEIs"
)]
pub struct ServeArgs {
    /// Address to bind the HTTP listener on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Run the browser with a visible window instead of headless.
    #[arg(long)]
    pub headed: bool,

    /// Browser executable; discovered on $PATH when unset.
    #[arg(long)]
    pub browser: Option<PathBuf>,

    /// Override the entry URL of the carrier flow.
    #[arg(long)]
    pub entry_url: Option<String>,
}

impl ServeArgs {
    pub fn checker_config(&self) -> Result<CheckerConfig> {
        let mut config = CheckerConfig::default();
        if let Some(entry_url) = &self.entry_url {
            Url::parse(entry_url).with_context(|| format!("invalid entry URL: {entry_url}"))?;
            config.entry_url = entry_url.clone();
        }
        Ok(config)
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            headless: !self.headed,
            executable: self.browser.clone(),
            ..BrowserOptions::default()
        }
    }
}
