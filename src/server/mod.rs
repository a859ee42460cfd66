use clap::Parser;

pub mod config;
pub mod error;
mod handlers;
pub mod main;
pub mod models;
pub mod router;
pub mod service;

/// Uptime status proxy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (TOML); defaults apply when it does not exist
    #[arg(short, long, default_value = "upstat.toml")]
    pub config: String,

    /// Listen address, overrides server.listen_addr (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Provider API key, overrides upstream.api_key
    #[arg(long, env = "UPSTAT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl Args {
    /// Applies command-line overrides on top of the file configuration.
    pub fn apply(&self, config: &mut config::Config) {
        if let Some(listen) = &self.listen {
            config.server.listen_addr = listen.clone();
        }
        if let Some(key) = &self.api_key {
            config.upstream.api_key = key.clone();
        }
    }
}
