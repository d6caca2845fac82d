//! CLI entry point for macooking

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "macooking")]
#[command(version)]
#[command(about = "Server-rendered Macooking blog backed by a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// List content from the configured backend
    List {
        /// Type of content to list (post, author)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Create a new markdown post
    New {
        /// Title of the new post
        title: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before loading config so override warnings show up
    let (filter, filter_handle) =
        reload::Layer::new(env_filter(&log_filter(cli.debug, false, false)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let site = macooking::Site::new(&base_dir)?;

    filter_handle
        .reload(env_filter(&log_filter(
            cli.debug,
            site.config.production,
            site.config.analyze,
        )))
        .context("Failed to apply log filter")?;

    match cli.command {
        Commands::Serve { port, ip } => {
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);
            site.serve(&ip, port).await?;
        }

        Commands::List { r#type } => {
            macooking::commands::list::run(&site, &r#type).await?;
        }

        Commands::New { title } => {
            let path = site.new_post(&title)?;
            println!("Created: {}", path.display());
        }

        Commands::Version => {
            println!("macooking version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

/// Default log directives; production keeps diagnostics out of the console
fn log_filter(debug: bool, production: bool, analyze: bool) -> String {
    let mut filter = if debug {
        "macooking=debug,info".to_string()
    } else if production {
        "warn".to_string()
    } else {
        "macooking=info".to_string()
    };
    if analyze {
        filter.push_str(",tower_http=debug");
    }
    filter
}

/// `RUST_LOG` wins over the computed directives
fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(false, false, false), "macooking=info");
        assert_eq!(log_filter(true, false, false), "macooking=debug,info");
        assert_eq!(log_filter(false, true, false), "warn");
    }

    #[test]
    fn test_analyze_enables_request_tracing() {
        assert_eq!(log_filter(false, false, true), "macooking=info,tower_http=debug");
        assert_eq!(log_filter(false, true, true), "warn,tower_http=debug");
    }
}
