//! Server roster and rotation mode
//!
//! The roster knows every server on staff, which of them are on duty, and
//! when each was last given a table. Load is never stored here; it is
//! counted from the table registry whenever it is asked for.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::balancer::Candidate;
use super::error::{FloorError, FloorResult};
use super::plan::MAX_SECTIONS;
use super::table::TableRegistry;

const LAST_SECTION: u32 = MAX_SECTIONS as u32;

// ============================================================================
// Rotation Mode
// ============================================================================

/// Strategy used to suggest the next server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Least recently seated server goes next
    RoundRobin,
    /// Server with the fewest open tables goes next
    #[default]
    LeastLoaded,
}

impl RotationMode {
    /// Get all modes
    pub fn all() -> Vec<Self> {
        vec![Self::RoundRobin, Self::LeastLoaded]
    }

    /// Mode ID as used in the API
    pub fn id(&self) -> &'static str {
        match self {
            Self::RoundRobin => "round_robin",
            Self::LeastLoaded => "least_loaded",
        }
    }

    /// Parse from string
    pub fn from_id(id: &str) -> FloorResult<Self> {
        match id.trim().to_lowercase().as_str() {
            "round_robin" | "round-robin" | "roundrobin" => Ok(Self::RoundRobin),
            "least_loaded" | "least-loaded" | "leastloaded" => Ok(Self::LeastLoaded),
            _ => Err(FloorError::invalid(format!(
                "unknown rotation mode '{}'. Valid options: {}",
                id,
                Self::all().iter().map(|m| m.id()).collect::<Vec<_>>().join(", ")
            ))),
        }
    }
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for RotationMode {
    type Err = FloorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

// ============================================================================
// Server
// ============================================================================

/// A server on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub name: String,

    /// Section the server normally covers
    pub section: Option<u32>,

    /// Whether the server is working and can be given tables
    pub on_duty: bool,

    /// Sequence number of the last seating given to this server
    pub last_seated: Option<u64>,

    /// Seatings marked against this server
    #[serde(default)]
    pub seatings: u32,

    // Stamps replaced by each mark, newest last
    #[serde(skip)]
    earlier: Vec<Option<u64>>,
}

impl Server {
    fn new(name: String, section: u32) -> Self {
        Self {
            name,
            section: Some(section),
            on_duty: true,
            last_seated: None,
            seatings: 0,
            earlier: Vec::new(),
        }
    }
}

// ============================================================================
// Server Roster
// ============================================================================

/// Every server on staff, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ServerRoster {
    servers: BTreeMap<String, Server>,
    rotation: RotationMode,
    seating_seq: u64,
}

impl ServerRoster {
    /// Create an empty roster
    pub fn new(rotation: RotationMode) -> Self {
        Self {
            servers: BTreeMap::new(),
            rotation,
            seating_seq: 0,
        }
    }

    /// Add an on-duty server
    ///
    /// Without an explicit section the server takes the lowest section no
    /// one else covers. The roster never holds more servers than the floor
    /// has sections.
    pub fn add_server(&mut self, name: &str, section: Option<u32>) -> FloorResult<&Server> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FloorError::invalid("server name must not be empty"));
        }
        if self.servers.contains_key(name) {
            return Err(FloorError::DuplicateServer(name.to_string()));
        }
        if self.servers.len() >= MAX_SECTIONS {
            return Err(FloorError::RosterFull(MAX_SECTIONS));
        }

        let section = match section {
            Some(s) if (1..=LAST_SECTION).contains(&s) => s,
            Some(s) => {
                return Err(FloorError::invalid(format!(
                    "section {s} is outside 1..={LAST_SECTION}"
                )))
            }
            None => self.free_section(),
        };

        let server = self
            .servers
            .entry(name.to_string())
            .or_insert_with(|| Server::new(name.to_string(), section));
        Ok(server)
    }

    // Lowest section without a server; the roster is never full here
    fn free_section(&self) -> u32 {
        (1..=LAST_SECTION)
            .find(|s| self.servers.values().all(|srv| srv.section != Some(*s)))
            .unwrap_or(LAST_SECTION)
    }

    /// Remove a server; `false` if unknown
    ///
    /// Tables keep whatever name they were assigned.
    pub fn remove_server(&mut self, name: &str) -> bool {
        self.servers.remove(name.trim()).is_some()
    }

    /// Mark a server on or off duty
    pub fn set_on_duty(&mut self, name: &str, on_duty: bool) -> FloorResult<&Server> {
        let server = self
            .servers
            .get_mut(name.trim())
            .ok_or_else(|| FloorError::ServerNotFound(name.to_string()))?;
        server.on_duty = on_duty;
        Ok(server)
    }

    /// Look up a server
    pub fn get(&self, name: &str) -> Option<&Server> {
        self.servers.get(name.trim())
    }

    /// Stamp a server with the next seating sequence number
    ///
    /// Names not on the roster are ignored.
    pub fn record_seating(&mut self, name: &str) {
        if let Some(server) = self.servers.get_mut(name) {
            self.seating_seq += 1;
            server.earlier.push(server.last_seated);
            server.last_seated = Some(self.seating_seq);
            server.seatings += 1;
        }
    }

    /// Take back the most recent seating mark
    ///
    /// The server's rotation position returns to where it stood before
    /// that mark. A server with no marks is left alone.
    pub fn unmark_seating(&mut self, name: &str) -> FloorResult<&Server> {
        let server = self
            .servers
            .get_mut(name.trim())
            .ok_or_else(|| FloorError::ServerNotFound(name.to_string()))?;
        if server.seatings > 0 {
            server.seatings -= 1;
            server.last_seated = server.earlier.pop().flatten();
        }
        Ok(server)
    }

    /// On-duty server names, sorted
    pub fn list_servers(&self) -> Vec<String> {
        self.on_duty().map(|s| s.name.clone()).collect()
    }

    /// Every server on staff, sorted by name
    pub fn all(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }

    fn on_duty(&self) -> impl Iterator<Item = &Server> {
        self.servers.values().filter(|s| s.on_duty)
    }

    /// Live load for each on-duty server
    pub fn loads(&self, tables: &TableRegistry) -> BTreeMap<String, usize> {
        self.on_duty()
            .map(|s| (s.name.clone(), tables.load_of(&s.name)))
            .collect()
    }

    /// Balancer input for each on-duty server
    pub fn candidates<'a>(&'a self, tables: &TableRegistry) -> Vec<Candidate<'a>> {
        self.on_duty()
            .map(|s| Candidate {
                name: &s.name,
                load: tables.load_of(&s.name),
                last_seated: s.last_seated,
            })
            .collect()
    }

    pub fn rotation(&self) -> RotationMode {
        self.rotation
    }

    pub fn set_rotation(&mut self, mode: RotationMode) {
        self.rotation = mode;
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
