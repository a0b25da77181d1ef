use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tableside::api::ApiServer;
use tableside::config::{Config, LoggingConfig};
use tableside::floor::FloorPlan;

#[derive(Parser)]
#[command(
    name = "tableside",
    version,
    about = "Live table, waitlist and server rotation tracking for a restaurant floor",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the floor API server
    Serve {
        /// TOML config file (environment variables are used when absent)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the bind address
        #[arg(short, long)]
        bind: Option<String>,

        /// Override the number of floor sections
        #[arg(short, long)]
        sections: Option<usize>,
    },

    /// Print the table layout for a section count as JSON
    Plan {
        /// Number of sections (2-9; anything else is one open section)
        #[arg(short, long, default_value = "3")]
        sections: usize,

        /// Seats per table
        #[arg(long, default_value = "4")]
        seats: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            bind,
            sections,
        } => {
            let mut config = load_config(config.as_deref())?;
            apply_overrides(&mut config, bind.as_deref(), sections)?;

            setup_tracing(&config.logging, cli.log_format.as_deref(), cli.verbose)?;
            tracing::info!(
                bind = %config.server.bind_address,
                sections = config.floor.sections,
                "Starting serve command"
            );
            serve(config).await?;
        }

        Commands::Plan { sections, seats } => {
            setup_tracing(&LoggingConfig::default(), cli.log_format.as_deref(), cli.verbose)?;
            print_plan(sections, seats)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> tableside::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    Ok(config)
}

fn apply_overrides(config: &mut Config, bind: Option<&str>, sections: Option<usize>) -> tableside::Result<()> {
    if let Some(bind) = bind {
        config.server.bind_address = bind
            .parse()
            .map_err(|_| tableside::Error::config(format!("Invalid bind address: {bind}")))?;
    }
    if let Some(sections) = sections {
        config.floor.sections = sections;
    }
    Ok(())
}

fn setup_tracing(logging: &LoggingConfig, format: Option<&str>, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(format!("tableside={level},warn")))
        .context("Invalid log level")?;

    match format.unwrap_or(logging.format.as_str()) {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}

async fn serve(config: Config) -> tableside::Result<()> {
    if config.server.enable_metrics {
        if let Err(e) = tableside::metrics::init_metrics() {
            tracing::warn!(error = %e, "Metrics initialization failed; continuing without metrics");
        }
    }

    let server = ApiServer::new(config)?;
    for line in server.info().display().lines() {
        tracing::info!("{line}");
    }

    server.start_with_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

fn print_plan(sections: usize, seats: u32) -> tableside::Result<()> {
    let tables = FloorPlan::Sections {
        count: sections,
        seats,
    }
    .build()?;

    tracing::debug!(sections, tables = tables.len(), "Built floor plan");
    println!("{}", serde_json::to_string_pretty(tables.list_all())?);
    Ok(())
}
