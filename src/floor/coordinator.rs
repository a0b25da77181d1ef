//! Floor coordinator
//!
//! Owns the table registry, waitlist and roster behind one lock. Every
//! command validates and applies under the write guard, so no reader ever
//! sees a half-applied transition and a rejected command changes nothing.
//!
//! ```text
//! free --seat--> seated --bus--> dirty --clear--> free
//! free --hold--> waiting --seat--> seated
//! waiting --release--> free
//! dirty --seat (confirmed)--> seated
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::FloorConfig;
use crate::metrics;

use super::error::{FloorError, FloorResult};
use super::roster::{RotationMode, Server, ServerRoster};
use super::snapshot::{self, FloorSnapshot, Suggestion};
use super::table::{Table, TableRegistry, TableStatus};
use super::waitlist::{self, WaitQuote, WaitlistEntry, WaitlistQueue};

/// Largest party accepted when no limit is configured
pub const DEFAULT_MAX_PARTY_SIZE: u32 = 20;

// ============================================================================
// Floor State
// ============================================================================

/// Everything the coordinator guards
#[derive(Debug, Clone)]
pub struct FloorState {
    pub(crate) tables: TableRegistry,
    pub(crate) waitlist: WaitlistQueue,
    pub(crate) roster: ServerRoster,
}

// ============================================================================
// Seat Request
// ============================================================================

/// Parameters for seating a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRequest {
    pub table_id: u32,

    /// Waitlist entry to consume
    #[serde(default)]
    pub wait_id: Option<Uuid>,

    /// Server to assign; the current assignment is kept when absent
    #[serde(default)]
    pub server: Option<String>,

    /// Party label for walk-ins
    #[serde(default)]
    pub party: Option<String>,

    /// Party size for walk-ins
    #[serde(default)]
    pub party_size: Option<u32>,

    /// Replacement notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Allow seating a table that has not been cleared
    #[serde(default)]
    pub confirm_dirty: bool,
}

impl SeatRequest {
    /// Seat `table_id` with no other changes
    pub fn new(table_id: u32) -> Self {
        Self {
            table_id,
            ..Default::default()
        }
    }

    pub fn with_wait(mut self, wait_id: Uuid) -> Self {
        self.wait_id = Some(wait_id);
        self
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub fn with_party(mut self, party: impl Into<String>, size: Option<u32>) -> Self {
        self.party = Some(party.into());
        self.party_size = size;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn confirm_dirty(mut self) -> Self {
        self.confirm_dirty = true;
        self
    }
}

// ============================================================================
// Floor Coordinator
// ============================================================================

/// Single owner of the floor state
#[derive(Debug)]
pub struct FloorCoordinator {
    state: RwLock<FloorState>,
    max_party_size: u32,
}

impl FloorCoordinator {
    /// Create a coordinator over an existing table registry and roster
    pub fn new(tables: TableRegistry, roster: ServerRoster) -> Self {
        Self {
            state: RwLock::new(FloorState {
                tables,
                waitlist: WaitlistQueue::new(),
                roster,
            }),
            max_party_size: DEFAULT_MAX_PARTY_SIZE,
        }
    }

    /// Build the floor described by configuration
    pub fn from_config(config: &FloorConfig) -> FloorResult<Self> {
        let tables = config.plan().build()?;

        let mut roster = ServerRoster::new(config.rotation);
        for server in &config.servers {
            roster.add_server(&server.name, server.section)?;
            if !server.on_duty {
                roster.set_on_duty(&server.name, false)?;
            }
        }

        tracing::info!(
            tables = tables.len(),
            servers = roster.len(),
            rotation = %config.rotation,
            "Floor initialized"
        );

        Ok(Self::new(tables, roster).with_max_party_size(config.max_party_size))
    }

    /// Override the largest accepted party
    pub fn with_max_party_size(mut self, max: u32) -> Self {
        self.max_party_size = max.max(1);
        self
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Consistent view of the whole floor
    pub async fn snapshot(&self) -> FloorSnapshot {
        let state = self.state.read().await;
        snapshot::project(&state, Utc::now())
    }

    /// Suggested next server and current loads
    pub async fn suggest_server(&self) -> Suggestion {
        let state = self.state.read().await;
        let suggestion = snapshot::suggestion(&state);
        tracing::debug!(suggestion = ?suggestion.suggestion, mode = %suggestion.mode, "Server suggested");
        suggestion
    }

    /// On-duty server names, sorted
    pub async fn list_servers(&self) -> Vec<String> {
        self.state.read().await.roster.list_servers()
    }

    /// Current state of one table
    pub async fn table(&self, table_id: u32) -> FloorResult<Table> {
        self.state.read().await.tables.get(table_id).cloned()
    }

    /// Waitlist in serving order
    pub async fn waitlist(&self) -> Vec<WaitlistEntry> {
        self.state.read().await.waitlist.list_all().to_vec()
    }

    // ------------------------------------------------------------------------
    // Waitlist
    // ------------------------------------------------------------------------

    /// Add a party to the end of the waitlist
    pub async fn add_wait(
        &self,
        name: &str,
        party: u32,
        notes: &str,
        quote: Option<WaitQuote>,
    ) -> FloorResult<WaitlistEntry> {
        let result: FloorResult<WaitlistEntry> = async {
            waitlist::validate_entry(name, party, quote.as_ref(), self.max_party_size)?;

            let mut state = self.state.write().await;
            let entry = state.waitlist.enqueue(name, party, notes, quote, Utc::now());
            publish_gauges(&state);

            tracing::info!(id = %entry.id, name = %entry.name, party, "Party added to waitlist");
            Ok(entry)
        }
        .await;

        observe("add_wait", result)
    }

    /// Remove a party; removing an absent id is not an error
    pub async fn remove_wait(&self, id: Uuid) -> bool {
        let mut state = self.state.write().await;
        let removed = state.waitlist.remove(id);
        publish_gauges(&state);

        tracing::info!(%id, removed, "Waitlist removal");
        metrics::record_command("remove_wait", "ok");
        removed
    }

    // ------------------------------------------------------------------------
    // Table transitions
    // ------------------------------------------------------------------------

    /// Seat a table, optionally consuming a waitlist entry
    ///
    /// All checks run before anything changes: a missing waitlist entry
    /// leaves the table exactly as it was.
    pub async fn seat(&self, request: SeatRequest) -> FloorResult<Table> {
        let result: FloorResult<Table> = async {
            if let Some(server) = &request.server {
                require_name(server, "server name")?;
            }
            match request.party_size {
                Some(0) => return Err(FloorError::invalid("party size must be at least 1")),
                Some(n) if n > self.max_party_size => {
                    return Err(FloorError::invalid(format!(
                        "party size {n} exceeds the maximum of {}",
                        self.max_party_size
                    )))
                }
                _ => {}
            }

            let mut guard = self.state.write().await;
            let FloorState {
                tables,
                waitlist,
                roster,
            } = &mut *guard;
            let table_id = request.table_id;

            let status = tables.get(table_id)?.status;
            let allowed = match status {
                TableStatus::Free | TableStatus::Waiting => true,
                TableStatus::Dirty => request.confirm_dirty,
                TableStatus::Seated => false,
            };
            if !allowed {
                return Err(FloorError::Conflict {
                    table_id,
                    status,
                    operation: "seat",
                });
            }

            let entry = match request.wait_id {
                Some(id) => Some(waitlist.dequeue(id)?),
                None => None,
            };

            let (party, party_size) = match &entry {
                Some(e) => (Some(e.name.clone()), Some(e.party)),
                None => (request.party.clone(), request.party_size),
            };

            tables.set_status(table_id, TableStatus::Seated, Utc::now())?;
            tables.set_party(table_id, party, party_size)?;
            if let Some(server) = &request.server {
                tables.assign_server(table_id, Some(server.trim().to_string()))?;
            }
            if let Some(notes) = &request.notes {
                tables.set_notes(table_id, notes.clone())?;
            }

            let table = tables.get(table_id)?.clone();
            if let Some(server) = &table.server {
                roster.record_seating(server);
            }
            publish_gauges(&guard);

            tracing::info!(
                table_id,
                server = ?table.server,
                party = ?table.party,
                wait_id = ?entry.as_ref().map(|e| e.id),
                from = %status,
                "Table seated"
            );
            Ok(table)
        }
        .await;

        observe("seat", result)
    }

    /// Mark a seated table as needing bussing
    pub async fn bus(&self, table_id: u32) -> FloorResult<Table> {
        let result = self
            .transition(table_id, TableStatus::Seated, TableStatus::Dirty, "bus", |_| Ok(()))
            .await;
        observe("bus", result)
    }

    /// Return a bussed table to service, dropping its server and notes
    pub async fn clear(&self, table_id: u32) -> FloorResult<Table> {
        let result = self
            .transition(table_id, TableStatus::Dirty, TableStatus::Free, "clear", |tables| {
                tables.assign_server(table_id, None)?;
                tables.set_notes(table_id, String::new())?;
                tables.set_party(table_id, None, None)?;
                Ok(())
            })
            .await;
        observe("clear", result)
    }

    /// Hold a free table for a party about to be seated
    pub async fn hold(&self, table_id: u32) -> FloorResult<Table> {
        let result = self
            .transition(table_id, TableStatus::Free, TableStatus::Waiting, "hold", |_| Ok(()))
            .await;
        observe("hold", result)
    }

    /// Release a held table
    pub async fn release(&self, table_id: u32) -> FloorResult<Table> {
        let result = self
            .transition(table_id, TableStatus::Waiting, TableStatus::Free, "release", |_| Ok(()))
            .await;
        observe("release", result)
    }

    async fn transition<F>(
        &self,
        table_id: u32,
        from: TableStatus,
        to: TableStatus,
        operation: &'static str,
        also: F,
    ) -> FloorResult<Table>
    where
        F: FnOnce(&mut TableRegistry) -> FloorResult<()>,
    {
        let mut state = self.state.write().await;

        let status = state.tables.get(table_id)?.status;
        if status != from {
            return Err(FloorError::Conflict {
                table_id,
                status,
                operation,
            });
        }

        state.tables.set_status(table_id, to, Utc::now())?;
        also(&mut state.tables)?;
        let table = state.tables.get(table_id)?.clone();
        publish_gauges(&state);

        tracing::info!(table_id, %from, %to, server = ?table.server, "Table {}", operation);
        Ok(table)
    }

    // ------------------------------------------------------------------------
    // Table details
    // ------------------------------------------------------------------------

    /// Assign or unassign a server without changing status
    ///
    /// Handing a seated table to a different server counts as a seating for
    /// that server, exactly as if it had been named when the party sat.
    pub async fn assign_server(&self, table_id: u32, server: Option<String>) -> FloorResult<Table> {
        let result: FloorResult<Table> = async {
            let server = match server {
                Some(name) => Some(require_name(&name, "server name")?.to_string()),
                None => None,
            };

            let mut guard = self.state.write().await;
            let FloorState { tables, roster, .. } = &mut *guard;

            let previous = tables.get(table_id)?.server.clone();
            let table = tables.assign_server(table_id, server)?.clone();

            let takes_seating = table.status == TableStatus::Seated && table.server != previous;
            if takes_seating {
                if let Some(name) = &table.server {
                    roster.record_seating(name);
                }
            }

            tracing::info!(table_id, server = ?table.server, counted = takes_seating, "Server assigned");
            Ok(table)
        }
        .await;

        observe("assign_server", result)
    }

    /// Replace a table's notes, whatever its status
    pub async fn set_notes(&self, table_id: u32, notes: String) -> FloorResult<Table> {
        let result: FloorResult<Table> = async {
            let mut state = self.state.write().await;
            let table = state.tables.set_notes(table_id, notes)?.clone();
            tracing::debug!(table_id, "Table notes updated");
            Ok(table)
        }
        .await;

        observe("set_notes", result)
    }

    // ------------------------------------------------------------------------
    // Roster
    // ------------------------------------------------------------------------

    /// Change the rotation mode from its API name
    pub async fn set_rotation(&self, mode: &str) -> FloorResult<RotationMode> {
        let result = match RotationMode::from_id(mode) {
            Ok(mode) => {
                self.set_rotation_mode(mode).await;
                Ok(mode)
            }
            Err(e) => Err(e),
        };
        observe("set_rotation", result)
    }

    /// Change the rotation mode
    pub async fn set_rotation_mode(&self, mode: RotationMode) {
        self.state.write().await.roster.set_rotation(mode);
        tracing::info!(%mode, "Rotation mode changed");
    }

    /// Put a new server on the roster, on duty
    pub async fn add_server(&self, name: &str, section: Option<u32>) -> FloorResult<Server> {
        let result: FloorResult<Server> = async {
            let mut state = self.state.write().await;
            let server = state.roster.add_server(name, section)?.clone();
            tracing::info!(name = %server.name, section = ?server.section, "Server added");
            Ok(server)
        }
        .await;

        observe("add_server", result)
    }

    /// Take back a server's most recent seating mark
    pub async fn unmark_seating(&self, name: &str) -> FloorResult<Server> {
        let result: FloorResult<Server> = async {
            let mut state = self.state.write().await;
            let server = state.roster.unmark_seating(name)?.clone();
            tracing::info!(
                name = %server.name,
                seatings = server.seatings,
                last_seated = ?server.last_seated,
                "Seating mark removed"
            );
            Ok(server)
        }
        .await;

        observe("unmark_seating", result)
    }

    /// Take a server off the roster; tables keep their assignment
    pub async fn remove_server(&self, name: &str) -> bool {
        let removed = self.state.write().await.roster.remove_server(name);
        tracing::info!(name, removed, "Server removal");
        metrics::record_command("remove_server", "ok");
        removed
    }

    /// Mark a server on or off duty
    pub async fn set_on_duty(&self, name: &str, on_duty: bool) -> FloorResult<Server> {
        let result: FloorResult<Server> = async {
            let mut state = self.state.write().await;
            let server = state.roster.set_on_duty(name, on_duty)?.clone();
            tracing::info!(name = %server.name, on_duty, "Server duty changed");
            Ok(server)
        }
        .await;

        observe("set_on_duty", result)
    }
}

fn require_name<'a>(name: &'a str, what: &str) -> FloorResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(FloorError::invalid(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

fn observe<T>(operation: &'static str, result: FloorResult<T>) -> FloorResult<T> {
    match &result {
        Ok(_) => metrics::record_command(operation, "ok"),
        Err(e) => {
            tracing::debug!(operation, error = %e, "Floor command rejected");
            metrics::record_command(operation, e.kind().label());
        }
    }
    result
}

fn publish_gauges(state: &FloorState) {
    let occupied = state.tables.count_status(TableStatus::Seated);
    metrics::update_floor_gauges(state.waitlist.len(), occupied);
}

// ============================================================================
// Tests
// ============================================================================
