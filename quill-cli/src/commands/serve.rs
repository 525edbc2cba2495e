//! HTTP server command
//!
//! Settings come from the environment (see `quill_server::config`); flags
//! given here override them.

use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::Parser;

use quill_server::config::parse_timezone;
use quill_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Address to bind to (overrides BIND_HOST)
    #[arg(long, short = 'b')]
    pub bind: Option<IpAddr>,

    /// Database URL (overrides the DB_* settings)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Timezone for the health check's current time (overrides DISPLAY_TIMEZONE)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    /// Apply command-line overrides to an environment-derived config.
    pub fn apply(self, mut config: ServerConfig) -> Result<ServerConfig> {
        if let Some(port) = self.port {
            config.bind_addr.set_port(port);
        }
        if let Some(ip) = self.bind {
            config.bind_addr.set_ip(ip);
        }
        if let Some(url) = self.database_url {
            config.database.url = Some(url);
        }
        if let Some(name) = self.timezone {
            config.timezone = parse_timezone(&name)?;
        }
        if self.cors_permissive {
            config.cors_permissive = true;
        }
        Ok(config)
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let config = args.apply(config)?;

    tracing::info!("Starting quill server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(config).await.context("Server error")?;

    Ok(())
}
