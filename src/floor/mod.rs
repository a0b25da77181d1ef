//! Floor-state coordination for a single restaurant
//!
//! This module owns the live state of the dining room: which tables are
//! free, seated or waiting to be bussed, who is waiting for a table, and
//! which server should be given the next party.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Floor Coordinator               │
//! │        (one RwLock around FloorState)        │
//! │                                              │
//! │  ┌──────────────┐ ┌──────────┐ ┌──────────┐  │
//! │  │    Table     │ │ Waitlist │ │  Server  │  │
//! │  │   Registry   │ │  Queue   │ │  Roster  │  │
//! │  └──────┬───────┘ └────┬─────┘ └────┬─────┘  │
//! │         │              │            │        │
//! │         └──────┬───────┴─────┬──────┘        │
//! │                ▼             ▼               │
//! │         ┌────────────┐ ┌───────────┐         │
//! │         │  Snapshot  │ │ Balancer  │         │
//! │         │ (read view)│ │  (pure)   │         │
//! │         └────────────┘ └───────────┘         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`table`] - Tables and the status they move through
//! - [`waitlist`] - FIFO queue of waiting parties
//! - [`roster`] - Servers on staff and the rotation mode
//! - [`balancer`] - Next-server suggestion
//! - [`coordinator`] - Atomic floor commands
//! - [`snapshot`] - Read-only views for clients
//! - [`plan`] - Initial table layouts
//!
//! # Quick Start
//!
//! ```
//! use tableside::floor::{FloorCoordinator, FloorPlan, RotationMode, SeatRequest, ServerRoster};
//!
//! # tokio_test::block_on(async {
//! let tables = FloorPlan::Sections { count: 3, seats: 4 }.build().unwrap();
//! let mut roster = ServerRoster::new(RotationMode::LeastLoaded);
//! roster.add_server("Alice", Some(1)).unwrap();
//!
//! let floor = FloorCoordinator::new(tables, roster);
//! let party = floor.add_wait("Smith", 4, "", None).await.unwrap();
//!
//! let server = floor.suggest_server().await.suggestion.unwrap();
//! let table = floor
//!     .seat(SeatRequest::new(31).with_wait(party.id).with_server(server))
//!     .await
//!     .unwrap();
//! assert_eq!(table.party.as_deref(), Some("Smith"));
//! # });
//! ```

pub mod balancer;
pub mod coordinator;
pub mod error;
pub mod plan;
pub mod roster;
pub mod snapshot;
pub mod table;
pub mod waitlist;

// Re-export main types
pub use balancer::{suggest, Candidate};
pub use coordinator::{FloorCoordinator, FloorState, SeatRequest};
pub use error::{ErrorKind, FloorError, FloorResult};
pub use plan::{FloorPlan, TableSpec};
pub use roster::{RotationMode, Server, ServerRoster};
pub use snapshot::{FloorCounts, FloorSnapshot, ServerView, Suggestion, WaitlistView};
pub use table::{Table, TableRegistry, TableStatus};
pub use waitlist::{Urgency, WaitQuote, WaitlistEntry, WaitlistQueue};
