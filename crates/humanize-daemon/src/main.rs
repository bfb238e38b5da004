//! Humanize Daemon - text humanization service
//!
//! Serves style analysis and the staged humanization pipeline over HTTP,
//! streaming per-stage progress to the client.

use clap::Parser;
use humanize_daemon::error::{DaemonError, DaemonResult};
use humanize_daemon::{DaemonConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Humanize Daemon CLI
#[derive(Parser)]
#[command(name = "humanized")]
#[command(about = "Humanize Daemon - rewrites machine-generated text", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "HUMANIZE_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides the configuration file)
    #[arg(short, long, env = "HUMANIZE_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "HUMANIZE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "HUMANIZE_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Print startup banner
    println!(
        r#"
  _   _                            _
 | | | |_   _ _ __ ___   __ _ _ __ (_)_______
 | |_| | | | | '_ ` _ \ / _` | '_ \| |_  / _ \
 |  _  | |_| | | | | | | (_| | | | | |/ /  __/
 |_| |_|\__,_|_| |_| |_|\__,_|_| |_|_/___\___|

  Version: {}
  Structural model: {:?} {}
  Authenticity model: {:?} {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.models.structural.backend,
        config.models.structural.model,
        config.models.authenticity.backend,
        config.models.authenticity.model,
        config.server.listen_addr
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
