//! Configuration management for tableside
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::api::ServerConfig;
use crate::floor::plan::{FloorPlan, TableSpec, MAX_SECTIONS};
use crate::floor::RotationMode;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Floor layout and staffing
    pub floor: FloorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Floor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    /// Number of sections in the house layout (1-9)
    pub sections: usize,

    /// Seats per table when a table does not say otherwise
    pub default_seats: u32,

    /// Largest party accepted onto the waitlist
    pub max_party_size: u32,

    /// Initial rotation mode
    pub rotation: RotationMode,

    /// Servers on the roster at startup
    pub servers: Vec<ServerEntry>,

    /// Explicit table list; replaces the house layout when non-empty
    pub tables: Vec<TableSpec>,
}

/// A server listed in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntry {
    pub name: String,
    #[serde(default)]
    pub section: Option<u32>,
    #[serde(default = "default_on_duty")]
    pub on_duty: bool,
}

fn default_on_duty() -> bool {
    true
}

impl ServerEntry {
    /// On-duty server with no section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: None,
            on_duty: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            sections: 3,
            default_seats: 4,
            max_party_size: crate::floor::coordinator::DEFAULT_MAX_PARTY_SIZE,
            rotation: RotationMode::default(),
            servers: Vec::new(),
            tables: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl FloorConfig {
    /// Table layout described by this configuration
    pub fn plan(&self) -> FloorPlan {
        if self.tables.is_empty() {
            FloorPlan::Sections {
                count: self.sections,
                seats: self.default_seats,
            }
        } else {
            FloorPlan::Explicit {
                tables: self.tables.clone(),
                default_seats: self.default_seats,
            }
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        let mut server = ServerConfig::builder();
        if let Ok(addr) = std::env::var("TABLESIDE_BIND") {
            server = server
                .bind_address_str(&addr)
                .context("Invalid TABLESIDE_BIND")?;
        }
        if let Some(enable) = env_parse::<bool>("TABLESIDE_CORS") {
            server = server.enable_cors(enable);
        }
        if let Some(enable) = env_parse::<bool>("TABLESIDE_REQUEST_LOG") {
            server = server.enable_request_logging(enable);
        }
        if let Some(enable) = env_parse::<bool>("TABLESIDE_METRICS") {
            server = server.enable_metrics(enable);
        }
        config.server = server.build().context("Invalid server settings")?;

        if let Some(sections) = env_parse::<usize>("TABLESIDE_SECTIONS") {
            config.floor.sections = sections;
        }

        if let Some(seats) = env_parse::<u32>("TABLESIDE_DEFAULT_SEATS") {
            config.floor.default_seats = seats;
        }

        if let Some(max) = env_parse::<u32>("TABLESIDE_MAX_PARTY") {
            config.floor.max_party_size = max;
        }

        if let Ok(mode) = std::env::var("TABLESIDE_ROTATION") {
            config.floor.rotation = mode
                .parse()
                .with_context(|| format!("Invalid TABLESIDE_ROTATION: {mode}"))?;
        }

        if let Ok(servers) = std::env::var("TABLESIDE_SERVERS") {
            config.floor.servers = servers
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(ServerEntry::new)
                .collect();
        }

        config.logging.level =
            std::env::var("TABLESIDE_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));
        config.logging.format =
            std::env::var("TABLESIDE_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;

        let floor = &self.floor;
        if floor.tables.is_empty() && !(1..=MAX_SECTIONS).contains(&floor.sections) {
            anyhow::bail!("sections must be between 1 and {MAX_SECTIONS}");
        }

        if floor.default_seats == 0 {
            anyhow::bail!("default_seats must be greater than 0");
        }

        if floor.max_party_size == 0 {
            anyhow::bail!("max_party_size must be greater than 0");
        }

        if floor.servers.len() > MAX_SECTIONS {
            anyhow::bail!("at most {MAX_SECTIONS} servers can be on the roster");
        }

        let mut names = HashSet::new();
        for server in &floor.servers {
            let name = server.name.trim();
            if name.is_empty() {
                anyhow::bail!("server names must not be empty");
            }
            if !names.insert(name) {
                anyhow::bail!("server '{name}' is listed more than once");
            }
            if let Some(section) = server.section {
                if section == 0 || section as usize > MAX_SECTIONS {
                    anyhow::bail!("server '{name}' has section {section}, outside 1..={MAX_SECTIONS}");
                }
            }
        }

        floor.plan().build().context("Invalid table layout")?;

        match self.logging.format.as_str() {
            "text" | "json" => {}
            other => anyhow::bail!("unknown log format '{other}'"),
        }

        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
