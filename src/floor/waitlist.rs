//! Waitlist queue
//!
//! Parties are served in arrival order. Entries are never reordered; they
//! leave the queue either by explicit removal or by being seated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{FloorError, FloorResult};

/// Longest wait a host can quote, in minutes
pub const MAX_QUOTE_MINUTES: u32 = 180;

// ============================================================================
// Wait Quote
// ============================================================================

/// Wait window quoted to a party, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitQuote {
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl WaitQuote {
    /// Create a quote, rejecting inverted or overlong windows
    pub fn new(min_minutes: u32, max_minutes: u32) -> FloorResult<Self> {
        let quote = Self {
            min_minutes,
            max_minutes,
        };
        quote.validate()?;
        Ok(quote)
    }

    /// Check the window is well formed
    pub fn validate(&self) -> FloorResult<()> {
        if self.min_minutes > self.max_minutes {
            return Err(FloorError::invalid(format!(
                "quote minimum ({}) exceeds maximum ({})",
                self.min_minutes, self.max_minutes
            )));
        }
        if self.max_minutes > MAX_QUOTE_MINUTES {
            return Err(FloorError::invalid(format!(
                "quote maximum must be at most {MAX_QUOTE_MINUTES} minutes"
            )));
        }
        Ok(())
    }
}

/// How pressing it is to seat a quoted party
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Still inside the minimum quoted wait
    CanWait,
    /// Between the minimum and maximum quote
    SeatSoon,
    /// At or past the maximum quote
    SeatNow,
}

// ============================================================================
// Waitlist Entry
// ============================================================================

/// A party waiting for a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub name: String,
    pub party: u32,
    pub notes: String,
    pub added_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<WaitQuote>,
}

impl WaitlistEntry {
    /// Whole minutes waited as of `now`
    pub fn minutes_waited(&self, now: DateTime<Utc>) -> i64 {
        (now - self.added_at).num_minutes().max(0)
    }

    /// Urgency as of `now`, if a quote was given
    pub fn urgency(&self, now: DateTime<Utc>) -> Option<Urgency> {
        let quote = self.quote?;
        let waited = self.minutes_waited(now);

        Some(if waited < i64::from(quote.min_minutes) {
            Urgency::CanWait
        } else if waited >= i64::from(quote.max_minutes) {
            Urgency::SeatNow
        } else {
            Urgency::SeatSoon
        })
    }
}

/// Validate the fields of a new waitlist entry
pub fn validate_entry(name: &str, party: u32, quote: Option<&WaitQuote>, max_party: u32) -> FloorResult<()> {
    if name.trim().is_empty() {
        return Err(FloorError::invalid("party name must not be empty"));
    }
    if party == 0 {
        return Err(FloorError::invalid("party size must be at least 1"));
    }
    if party > max_party {
        return Err(FloorError::invalid(format!(
            "party size {party} exceeds the maximum of {max_party}"
        )));
    }
    if let Some(quote) = quote {
        quote.validate()?;
    }
    Ok(())
}

// ============================================================================
// Waitlist Queue
// ============================================================================

/// FIFO queue of waiting parties
#[derive(Debug, Clone, Default)]
pub struct WaitlistQueue {
    entries: Vec<WaitlistEntry>,
}

impl WaitlistQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a party with a fresh id
    pub fn enqueue(
        &mut self,
        name: impl Into<String>,
        party: u32,
        notes: impl Into<String>,
        quote: Option<WaitQuote>,
        now: DateTime<Utc>,
    ) -> WaitlistEntry {
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            name: name.into().trim().to_string(),
            party,
            notes: notes.into(),
            added_at: now,
            quote,
        };
        self.entries.push(entry.clone());
        entry
    }

    /// Remove an entry; `false` if it was not queued
    pub fn remove(&mut self, id: Uuid) -> bool {
        self.dequeue(id).is_ok()
    }

    /// Remove and return an entry
    pub fn dequeue(&mut self, id: Uuid) -> FloorResult<WaitlistEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(FloorError::WaitNotFound(id))?;
        Ok(self.entries.remove(pos))
    }

    /// All entries in arrival order
    pub fn list_all(&self) -> &[WaitlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_fifo_order() {
        let mut queue = WaitlistQueue::new();
        let now = Utc::now();
        queue.enqueue("Smith", 4, "", None, now);
        queue.enqueue("Lee", 2, "", None, now);

        let names: Vec<&str> = queue.list_all().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Smith", "Lee"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut queue = WaitlistQueue::new();
        let smith = queue.enqueue("Smith", 4, "", None, Utc::now());
        queue.enqueue("Lee", 2, "", None, Utc::now());

        assert!(queue.remove(smith.id));
        assert!(!queue.remove(smith.id));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.list_all()[0].name, "Lee");
    }

    #[test]
    fn test_dequeue_returns_entry() {
        let mut queue = WaitlistQueue::new();
        let smith = queue.enqueue("Smith", 4, "window", None, Utc::now());

        let taken = queue.dequeue(smith.id).unwrap();
        assert_eq!(taken, smith);
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(smith.id).unwrap_err(), FloorError::WaitNotFound(smith.id));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut queue = WaitlistQueue::new();
        let a = queue.enqueue("A", 1, "", None, Utc::now());
        queue.remove(a.id);
        let b = queue.enqueue("A", 1, "", None, Utc::now());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_validate_entry() {
        assert!(validate_entry("Smith", 4, None, 20).is_ok());
        assert!(validate_entry("   ", 4, None, 20).is_err());
        assert!(validate_entry("Smith", 0, None, 20).is_err());
        assert!(validate_entry("Smith", 21, None, 20).is_err());

        let bad = WaitQuote {
            min_minutes: 30,
            max_minutes: 10,
        };
        assert!(validate_entry("Smith", 2, Some(&bad), 20).is_err());
    }

    #[test]
    fn test_quote_limits() {
        assert!(WaitQuote::new(0, 30).is_ok());
        assert!(WaitQuote::new(0, MAX_QUOTE_MINUTES + 1).is_err());
    }

    #[test]
    fn test_urgency() {
        let added = Utc::now();
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            name: "Smith".into(),
            party: 2,
            notes: String::new(),
            added_at: added,
            quote: Some(WaitQuote::new(10, 30).unwrap()),
        };

        assert_eq!(entry.urgency(added + Duration::minutes(5)), Some(Urgency::CanWait));
        assert_eq!(entry.urgency(added + Duration::minutes(10)), Some(Urgency::SeatSoon));
        assert_eq!(entry.urgency(added + Duration::minutes(30)), Some(Urgency::SeatNow));

        let unquoted = WaitlistEntry { quote: None, ..entry };
        assert_eq!(unquoted.urgency(added), None);
    }
}
