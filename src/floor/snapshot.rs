//! Read-only projections of the floor
//!
//! Snapshots are built from a borrowed floor state while the coordinator
//! holds its read lock, so they always reflect fully committed commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::balancer;
use super::coordinator::FloorState;
use super::roster::{RotationMode, Server};
use super::table::{Table, TableStatus};
use super::waitlist::{Urgency, WaitlistEntry};

/// A waitlist entry as shown to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistView {
    #[serde(flatten)]
    pub entry: WaitlistEntry,

    /// Present only for quoted parties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
}

/// A roster entry with its live load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerView {
    pub name: String,
    pub section: Option<u32>,
    pub on_duty: bool,
    pub load: usize,
    pub seatings: u32,
}

/// Next-server suggestion with the loads it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggestion: Option<String>,
    pub loads: BTreeMap<String, usize>,
    pub mode: RotationMode,
}

/// Table counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorCounts {
    pub free: usize,
    pub seated: usize,
    pub dirty: usize,
    pub waiting: usize,
}

/// Complete, consistent view of the floor at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    pub generated_at: DateTime<Utc>,
    pub tables: Vec<Table>,
    pub counts: FloorCounts,
    pub waitlist: Vec<WaitlistView>,
    pub servers: Vec<ServerView>,
    pub loads: BTreeMap<String, usize>,
    pub rotation: RotationMode,
    pub suggestion: Option<String>,
}

impl FloorSnapshot {
    /// Find a table in the snapshot
    pub fn table(&self, id: u32) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }
}

/// Compute the suggestion for the current floor
pub(crate) fn suggestion(state: &FloorState) -> Suggestion {
    let mode = state.roster.rotation();
    let candidates = state.roster.candidates(&state.tables);

    Suggestion {
        suggestion: balancer::suggest(&candidates, mode),
        loads: state.roster.loads(&state.tables),
        mode,
    }
}

/// Build a snapshot of the whole floor
pub(crate) fn project(state: &FloorState, now: DateTime<Utc>) -> FloorSnapshot {
    let Suggestion {
        suggestion,
        loads,
        mode,
    } = suggestion(state);

    let tables = &state.tables;
    let counts = FloorCounts {
        free: tables.count_status(TableStatus::Free),
        seated: tables.count_status(TableStatus::Seated),
        dirty: tables.count_status(TableStatus::Dirty),
        waiting: tables.count_status(TableStatus::Waiting),
    };

    let waitlist = state
        .waitlist
        .list_all()
        .iter()
        .map(|entry| WaitlistView {
            urgency: entry.urgency(now),
            entry: entry.clone(),
        })
        .collect();

    let servers = state
        .roster
        .all()
        .map(|server: &Server| ServerView {
            name: server.name.clone(),
            section: server.section,
            on_duty: server.on_duty,
            load: tables.load_of(&server.name),
            seatings: server.seatings,
        })
        .collect();

    FloorSnapshot {
        generated_at: now,
        tables: tables.list_all().to_vec(),
        counts,
        waitlist,
        servers,
        loads,
        rotation: mode,
        suggestion,
    }
}
