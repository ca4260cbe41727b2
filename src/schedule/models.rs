//! Round-robin schedule data models.

use serde::{Deserialize, Serialize};

/// A single pairing within a round.
///
/// Side order carries no competitive meaning; it is shuffled for
/// presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing<T> {
    pub first: T,
    pub second: T,
}

/// One day of a tournament: every entrant plays at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round<T> {
    /// Pairings for the day, in presentation order
    pub pairings: Vec<Pairing<T>>,
    /// The entrant sitting out when the field is odd
    pub bye: Option<T>,
}

/// A complete round-robin schedule: every entrant meets every other
/// exactly once across the rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule<T> {
    pub rounds: Vec<Round<T>>,
}

impl<T> Schedule<T> {
    /// Number of rounds in the schedule
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Total number of pairings across all rounds
    pub fn pairing_count(&self) -> usize {
        self.rounds.iter().map(|r| r.pairings.len()).sum()
    }
}
