//! Table registry
//!
//! Holds the fixed set of tables on the floor. Tables are created once from
//! the floor plan and never added or removed afterwards; only their status,
//! assignment and notes change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::error::{FloorError, FloorResult};

// ============================================================================
// Table Status
// ============================================================================

/// Status of a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Clean and available
    #[default]
    Free,

    /// A party is sitting at the table
    Seated,

    /// Party left, table needs bussing before reuse
    Dirty,

    /// Held for a party that is about to be seated
    Waiting,
}

impl TableStatus {
    /// Status as used in the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Seated => "seated",
            Self::Dirty => "dirty",
            Self::Waiting => "waiting",
        }
    }

    /// Whether the table counts toward its server's load
    pub fn is_workload(&self) -> bool {
        matches!(self, Self::Seated | Self::Dirty)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = FloorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" | "available" => Ok(Self::Free),
            "seated" | "taken" => Ok(Self::Seated),
            "dirty" => Ok(Self::Dirty),
            "waiting" | "held" => Ok(Self::Waiting),
            other => Err(FloorError::invalid(format!("unknown table status '{other}'"))),
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// A table on the floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table number
    pub id: u32,

    /// Display name
    pub name: String,

    /// Section the table belongs to
    pub section: u32,

    /// Seating capacity
    pub seats: u32,

    /// Current status
    pub status: TableStatus,

    /// Assigned server, by roster name
    pub server: Option<String>,

    /// Set only while seated
    pub seated_at: Option<DateTime<Utc>>,

    /// Label of the seated party
    pub party: Option<String>,

    /// Size of the seated party, when known
    pub party_size: Option<u32>,

    /// Free text
    pub notes: String,
}

impl Table {
    /// Create a free, unassigned table
    pub fn new(id: u32, section: u32, seats: u32) -> Self {
        Self {
            id,
            name: format!("Table {id}"),
            section,
            seats,
            status: TableStatus::default(),
            server: None,
            seated_at: None,
            party: None,
            party_size: None,
            notes: String::new(),
        }
    }

    /// Override the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether this table is assigned to `server` and counts toward its load
    pub fn is_load_for(&self, server: &str) -> bool {
        self.status.is_workload() && self.server.as_deref() == Some(server)
    }
}

// ============================================================================
// Table Registry
// ============================================================================

/// Registry of every table on the floor, in plan order
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: Vec<Table>,
    index: HashMap<u32, usize>,
}

impl TableRegistry {
    /// Build a registry from a table list
    ///
    /// Fails if ids repeat or a table has no seats.
    pub fn new(tables: Vec<Table>) -> FloorResult<Self> {
        let mut index = HashMap::with_capacity(tables.len());

        for (pos, table) in tables.iter().enumerate() {
            if table.seats == 0 {
                return Err(FloorError::invalid(format!(
                    "table {} must have at least one seat",
                    table.id
                )));
            }
            if index.insert(table.id, pos).is_some() {
                return Err(FloorError::invalid(format!("duplicate table id {}", table.id)));
            }
        }

        Ok(Self { tables, index })
    }

    /// Get a table by id
    pub fn get(&self, id: u32) -> FloorResult<&Table> {
        self.index
            .get(&id)
            .map(|&pos| &self.tables[pos])
            .ok_or(FloorError::TableNotFound(id))
    }

    fn get_mut(&mut self, id: u32) -> FloorResult<&mut Table> {
        let pos = *self.index.get(&id).ok_or(FloorError::TableNotFound(id))?;
        Ok(&mut self.tables[pos])
    }

    /// Set a table's status, keeping `seated_at` in step
    ///
    /// `seated_at` becomes `now` on entering seated (even when re-seating an
    /// already seated table) and is cleared for every other status.
    pub fn set_status(&mut self, id: u32, status: TableStatus, now: DateTime<Utc>) -> FloorResult<&Table> {
        let table = self.get_mut(id)?;
        table.status = status;
        table.seated_at = (status == TableStatus::Seated).then_some(now);
        Ok(table)
    }

    /// Assign or unassign a server
    pub fn assign_server(&mut self, id: u32, server: Option<String>) -> FloorResult<&Table> {
        let table = self.get_mut(id)?;
        table.server = server;
        Ok(table)
    }

    /// Replace a table's notes
    pub fn set_notes(&mut self, id: u32, notes: impl Into<String>) -> FloorResult<&Table> {
        let table = self.get_mut(id)?;
        table.notes = notes.into();
        Ok(table)
    }

    /// Set or clear the seated party label
    pub fn set_party(&mut self, id: u32, party: Option<String>, party_size: Option<u32>) -> FloorResult<&Table> {
        let table = self.get_mut(id)?;
        table.party = party;
        table.party_size = party_size;
        Ok(table)
    }

    /// All tables in plan order
    pub fn list_all(&self) -> &[Table] {
        &self.tables
    }

    /// Number of tables assigned to `server` that are seated or dirty
    pub fn load_of(&self, server: &str) -> usize {
        self.tables.iter().filter(|t| t.is_load_for(server)).count()
    }

    /// Number of tables in a given status
    pub fn count_status(&self, status: TableStatus) -> usize {
        self.tables.iter().filter(|t| t.status == status).count()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the floor has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
