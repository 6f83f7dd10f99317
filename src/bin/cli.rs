//! crawl-policy CLI
//!
//! Prints, builds or serves the robots policy, sitemap and head metadata.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use crawl_policy::{
    error::{AppError, Result},
    models::{Config, LoggingConfig},
    pipeline,
    services::{Clock, FixedClock, SiteSurface, SystemClock},
    storage::LocalStorage,
};

/// crawl-policy - Robots, sitemap and route metadata generator
#[derive(Parser, Debug)]
#[command(
    name = "crawl-policy",
    version,
    about = "Crawl-control surface for the booking site"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print robots.txt
    Robots,

    /// Print sitemap.xml
    Sitemap {
        /// Fixed lastmod timestamp (RFC 3339) instead of the current time
        #[arg(long)]
        at: Option<String>,
    },

    /// Print the head fragment for a request path
    Head {
        /// Request path, e.g. /panel/bookings
        path: String,
    },

    /// Print protected route descriptors as JSON
    Routes,

    /// Print the effective configuration as TOML
    Config,

    /// Validate configuration and cross-layer consistency
    Validate,

    /// Write robots.txt, sitemap.xml and head fragments to a directory
    Build {
        /// Output directory
        #[arg(long, default_value = "public")]
        out: PathBuf,
    },

    /// Serve the generated files over HTTP
    #[cfg(feature = "serve")]
    Serve {
        /// Listen address (default: server.bind)
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Initialize logging. `RUST_LOG` takes precedence over the given level.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn parse_at(at: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(at)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::config(format!("invalid --at timestamp '{at}': {e}")))
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.logging.level.clone(),
        (Err(_), false) => LoggingConfig::default().level,
    };
    init_logging(&level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });
    config.apply_env();
    log::debug!("Base URL: {}", config.site.base_url);

    match cli.command {
        Command::Robots => {
            let (surface, _) = SiteSurface::build_reported(&config, Arc::new(SystemClock))?;
            print!("{}", surface.robots.render());
        }

        Command::Sitemap { at } => {
            let clock: Arc<dyn Clock> = match at {
                Some(at) => Arc::new(FixedClock(parse_at(&at)?)),
                None => Arc::new(SystemClock),
            };
            let (surface, _) = SiteSurface::build_reported(&config, clock)?;
            print!("{}", surface.sitemap.render()?);
        }

        Command::Head { path } => {
            let (surface, _) = SiteSurface::build_reported(&config, Arc::new(SystemClock))?;
            print!("{}", surface.metadata.render_for(&path));
        }

        Command::Routes => {
            let json = serde_json::to_string_pretty(&config.metadata.protected)?;
            println!("{json}");
        }

        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }

        Command::Validate => {
            pipeline::run_validate(&config)?;
            log::info!("All validations passed!");
        }

        Command::Build { out } => {
            config.validate()?;
            let surface = SiteSurface::build_checked(&config, Arc::new(SystemClock))?;
            let storage = LocalStorage::new(&out);
            pipeline::run_build(&surface, &storage).await?;
            log::info!("Build complete: {}", out.display());
        }

        #[cfg(feature = "serve")]
        Command::Serve { bind } => {
            config.validate()?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let surface = SiteSurface::build_checked(&config, Arc::new(SystemClock))?;
            pipeline::run_server(Arc::new(surface), &bind).await?;
        }
    }

    Ok(())
}
